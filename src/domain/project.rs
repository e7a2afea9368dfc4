use std::collections::HashSet;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PortfolioError {
    #[error("project name must not be empty")]
    EmptyName,
    #[error("duplicate project name: {0}")]
    DuplicateName(String),
    #[error("start week of project {name} must be at least 1, got {start_week}")]
    InvalidStartWeek { name: String, start_week: u32 },
    #[error("original hours of project {name} must be a non-negative number, got {hours}")]
    InvalidHours { name: String, hours: f64 },
    #[error("complexity of project {name} must be a positive number, got {complexity}")]
    InvalidComplexity { name: String, complexity: f64 },
}

/// Stable index of a project inside its [`Portfolio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(pub usize);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub name: String,
    pub start_week: u32,
    pub muted: bool,
    pub original_hours: f64,
    pub complexity: f64,
    pub adjusted_hours: f64,
    pub rounded_adjusted_hours: f64,
    pub remaining_hours: f64,
    pub end_week: Option<u32>,
    pub group: Option<String>,
    /// Raw unit count as entered; only [`Project::stock_units`] is trusted.
    pub units: Option<String>,
    /// Set when the project takes part in its group's inventory simulation.
    pub stock_units: Option<u64>,
    pub pre_sales_lead_months: u32,
    pub sales_contribution_start_week: Option<u32>,
}

impl Project {
    pub fn new(name: &str, start_week: u32, original_hours: f64, complexity: f64) -> Self {
        Self {
            name: name.to_string(),
            start_week,
            original_hours,
            complexity,
            ..Self::default()
        }
    }

    pub fn is_inventory_participant(&self) -> bool {
        self.stock_units.is_some()
    }

    /// `end_week` once allocation ran, otherwise the start week.
    pub fn end_week_or_start(&self) -> u32 {
        self.end_week.unwrap_or(self.start_week)
    }
}

/// Owned collection of projects for one simulation run, with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    projects: Vec<Project>,
}

impl Portfolio {
    pub fn new(mut projects: Vec<Project>) -> Result<Self, PortfolioError> {
        let mut names = HashSet::with_capacity(projects.len());
        for project in &mut projects {
            validate_project(project)?;
            if !names.insert(project.name.clone()) {
                return Err(PortfolioError::DuplicateName(project.name.clone()));
            }
            project.stock_units = parse_stock_units(project.group.as_deref(), project.units.as_deref());
        }
        Ok(Self { projects })
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ProjectId> + use<> {
        (0..self.projects.len()).map(ProjectId)
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectId, &Project)> {
        self.projects
            .iter()
            .enumerate()
            .map(|(idx, project)| (ProjectId(idx), project))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ProjectId, &mut Project)> {
        self.projects
            .iter_mut()
            .enumerate()
            .map(|(idx, project)| (ProjectId(idx), project))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}

fn validate_project(project: &Project) -> Result<(), PortfolioError> {
    if project.name.trim().is_empty() {
        return Err(PortfolioError::EmptyName);
    }
    if project.start_week < 1 {
        return Err(PortfolioError::InvalidStartWeek {
            name: project.name.clone(),
            start_week: project.start_week,
        });
    }
    if !project.original_hours.is_finite() || project.original_hours < 0.0 {
        return Err(PortfolioError::InvalidHours {
            name: project.name.clone(),
            hours: project.original_hours,
        });
    }
    if !project.complexity.is_finite() || project.complexity <= 0.0 {
        return Err(PortfolioError::InvalidComplexity {
            name: project.name.clone(),
            complexity: project.complexity,
        });
    }
    Ok(())
}

/// A project stocks inventory only with a non-empty group and a unit count
/// made purely of ASCII digits whose value is positive.
pub fn parse_stock_units(group: Option<&str>, units: Option<&str>) -> Option<u64> {
    let group = group?;
    if group.is_empty() {
        return None;
    }
    let units = units?;
    if units.is_empty() || !units.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    units.parse::<u64>().ok().filter(|value| *value > 0)
}
