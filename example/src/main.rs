//! Terminal walkthrough of the calendar: renders a month, drives it with a
//! scripted sequence of key presses and follows an ambient theme change.
use std::sync::Arc;

use chrono::Weekday;
use flexi_calendar::{
    Calendar, CalendarArgs, CalendarDate, CalendarKey, DayCell, HighlightKind, HighlightSpec,
    KeyModifiers, PreferenceBroadcaster,
};
use parking_lot::Mutex;
use tracing::{info, warn};

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("warn,flexi_calendar=info,example=info") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("warn"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .try_init();
}

fn cell_text(cell: &DayCell) -> String {
    if cell.is_placeholder {
        return "    ".to_string();
    }
    let (open, close) = if cell.is_focused {
        ('[', ']')
    } else if cell.is_selected {
        ('(', ')')
    } else {
        (' ', ' ')
    };
    let mark = if cell.is_disabled {
        'x'
    } else if cell.badge.is_some() {
        '*'
    } else if cell.show_dot {
        '.'
    } else {
        ' '
    };
    format!("{open}{:>2}{close}{mark}", cell.day_number)
}

fn print_month(calendar: &Calendar) {
    println!();
    println!("{}  ({})", calendar.month_label(), calendar.color_mode().as_str());
    let header: Vec<String> = calendar
        .weekday_labels()
        .iter()
        .map(|label| format!(" {:<4}", label.short))
        .collect();
    println!("{}", header.concat());
    let cells = calendar.day_cells();
    for week in cells.chunks(7) {
        let row: Vec<String> = week.iter().map(|cell| format!("{} ", cell_text(cell))).collect();
        println!("{}", row.concat());
    }
}

fn press(calendar: &mut Calendar, key: CalendarKey, modifiers: KeyModifiers) {
    let Some(cell) = calendar.focused_date() else {
        warn!("nothing is focusable, ignoring {key:?}");
        return;
    };
    let consumed = calendar.handle_key(key, modifiers, cell);
    info!(
        "{key:?} on {cell} -> focus {:?}, consumed {consumed}",
        calendar.focused_date().map(|date| date.to_string())
    );
}

fn main() {
    init_tracing();

    let initial = std::env::args().nth(1).unwrap_or_else(|| "2024-03-15".to_string());
    let selections = Arc::new(Mutex::new(Vec::<CalendarDate>::new()));
    let sink = Arc::clone(&selections);
    let preference = PreferenceBroadcaster::new(false);

    let args = CalendarArgs::default()
        .initial_date(initial.as_str())
        .locale("en-US")
        .week_starts_on(Weekday::Mon)
        .min_date("2024-01-01")
        .max_date("2025-12-31")
        .disabled_dates(["2024-03-09", "2024-03-10", "2024-03-16", "2024-03-17"])
        .highlighted_dates(vec![
            HighlightSpec::new("2024-03-08").label("IWD"),
            HighlightSpec::new("2024-03-20").kind(HighlightKind::Dot),
            HighlightSpec::new("2024-03-31")
                .kind(HighlightKind::Badge)
                .color("#f43f5e"),
        ])
        .on_date_select(move |date: CalendarDate| {
            info!("selected {date}");
            sink.lock().push(date);
        })
        .on_month_change(|anchor: CalendarDate| info!("showing month of {anchor}"));

    let mut calendar = Calendar::new(args, Arc::new(preference.clone()));
    print_month(&calendar);

    let none = KeyModifiers::NONE;
    for key in [
        CalendarKey::ArrowRight,
        CalendarKey::ArrowDown,
        CalendarKey::ArrowDown,
        CalendarKey::End,
        CalendarKey::Enter,
    ] {
        press(&mut calendar, key, none);
    }
    print_month(&calendar);

    press(&mut calendar, CalendarKey::PageDown, none);
    press(&mut calendar, CalendarKey::Home, none);
    press(&mut calendar, CalendarKey::Space, none);
    print_month(&calendar);

    preference.set_prefers_dark(true);
    press(&mut calendar, CalendarKey::PageUp, KeyModifiers::SHIFT);
    print_month(&calendar);

    for (name, value) in calendar.style_variables() {
        println!("{name}: {value};");
    }
    println!("class=\"{}\"", calendar.root_class_name());
    println!("selections: {:?}", selections.lock().iter().map(ToString::to_string).collect::<Vec<_>>());
}
