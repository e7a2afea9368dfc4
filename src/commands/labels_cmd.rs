use crate::commands::base_commands::Commands;
use crate::domain::calendar::WeekCalendar;
use crate::services::settings_yaml::load_settings_if_provided;

pub fn labels_command(cmd: Commands) {
    if let Commands::Labels { weeks, settings } = cmd {
        let settings = match load_settings_if_provided(settings.as_deref()) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings: {e:?}");
                return;
            }
        };
        println!("{}", format_labels(&WeekCalendar::new(settings.epoch), weeks));
    }
}

pub fn format_labels(calendar: &WeekCalendar, weeks: u32) -> String {
    let mut lines = vec!["Months:".to_string()];
    for label in calendar.month_labels(weeks).iter().filter(|label| label.week_count > 0) {
        lines.push(format!(
            "{}: weeks {}-{}",
            label.name(),
            label.start_week,
            label.start_week + label.week_count - 1
        ));
    }
    lines.push("Quarters:".to_string());
    for range in calendar.quarter_ranges(weeks) {
        lines.push(format!(
            "{}: weeks {}-{}",
            range.key(),
            range.start_week,
            range.start_week + range.week_count - 1
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::default_epoch;

    #[test]
    fn format_labels_lists_months_then_quarters() {
        let output = format_labels(&WeekCalendar::new(default_epoch()), 14);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Months:");
        assert_eq!(lines[1], "Jan 2025: weeks 1-5");
        assert_eq!(lines[2], "Feb 2025: weeks 6-9");
        assert_eq!(lines[3], "Mar 2025: weeks 10-13");
        assert_eq!(lines[4], "Apr 2025: weeks 14-14");
        assert_eq!(lines[5], "Quarters:");
        assert_eq!(lines[6], "2025-Q1: weeks 1-13");
        assert_eq!(lines[7], "2025-Q2: weeks 14-14");
    }

    #[test]
    fn format_labels_for_empty_timeline_has_headers_only() {
        let output = format_labels(&WeekCalendar::new(default_epoch()), 0);
        assert_eq!(output, "Months:\nQuarters:");
    }
}
