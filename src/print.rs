//! ## Printing Module
//!
//! This module is only here to make logging in the terminal easier to read.
//! It prints in appropriate colors depending on the situation, and renders the dispatcher
//! status as a table.
//!
//! Every level can be switched off at runtime through the toggles in [config]
//! (see [crate::init::parse_args]).
use ansi_term::Colour::{self, Green, Red, Yellow, Purple};
use prettytable::{format, Cell, Row, Table};
use unicode_width::UnicodeWidthStr;

use crate::cabin::{CabinBehaviour, Dirn};
use crate::config;
use crate::elevator_logic::DispatcherSnapshot;

/// Prints an error message in red to the terminal.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
///
/// ## Example
/// ```
/// use elevator_dispatch::print;
///
/// print::err("Something went wrong!".to_string());
/// ```
pub fn err(msg: String) {
    if config::toggle(&config::PRINT_ERR_ON) {
        println!("{}{}\n", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
pub fn warn(msg: String) {
    if config::toggle(&config::PRINT_WARN_ON) {
        println!("{}{}\n", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints a success message in green to the terminal.
///
/// ## Terminal output
/// - "\[OK\]:      {}", msg
pub fn ok(msg: String) {
    if config::toggle(&config::PRINT_OK_ON) {
        println!("{}{}\n", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an informational message in light blue to the terminal.
///
/// ## Terminal output
/// - "\[INFO\]:    {}", msg
pub fn info(msg: String) {
    let light_blue = Colour::RGB(102, 178, 255);
    if config::toggle(&config::PRINT_INFO_ON) {
        println!("{}{}\n", light_blue.paint("[INFO]:    "), light_blue.paint(msg));
    }
}

/// Prints a message for something that should be impossible, in a rainbow.
///
/// Used where the code has reached a branch that the state machine rules out. Always
/// printed, regardless of toggles.
pub fn cosmic_err(fun: String) {
    print!("{}", Colour::Red.paint("[ERROR]: "));

    let colors = [
        Colour::Red,
        Colour::Yellow,
        Colour::Green,
        Colour::Cyan,
        Colour::Blue,
        Colour::Purple,
    ];

    let message = format!("Cosmic rays flipped a bit! IN: {}", fun);
    for (i, c) in message.chars().enumerate() {
        let color = colors[i % colors.len()];
        print!("{}", color.paint(c.to_string()));
    }

    println!();
}

/// Pads the input text to a fixed display width using spaces.
///
/// Accounts for characters that take more than one column (arrows, symbols), so table
/// cells line up in a monospaced terminal.
fn pad_text(text: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible_width);
    format!("{}{}", text, " ".repeat(padding))
}

fn dirn_label(dirn: Dirn) -> &'static str {
    match dirn {
        Dirn::Up => "↑ up",
        Dirn::Down => "↓ down",
        Dirn::Stop => "· stop",
    }
}

fn behaviour_label(behaviour: CabinBehaviour) -> String {
    let text = pad_text(&format!("{:?}", behaviour), 10);
    match behaviour {
        CabinBehaviour::Idle => Green.paint(text).to_string(),
        CabinBehaviour::MovingUp | CabinBehaviour::MovingDown => Yellow.paint(text).to_string(),
        CabinBehaviour::DoorOpen => Purple.paint(text).to_string(),
    }
}

/// Builds the floor-by-floor table shown by [status]. Top floor first.
pub fn status_table(snapshot: &DispatcherSnapshot) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new("Floor"),
        Cell::new("Cabin"),
        Cell::new("Hall up"),
        Cell::new("Hall down"),
        Cell::new("Cab"),
    ]));

    for floor in (snapshot.min_floor..=snapshot.max_floor).rev() {
        let cabin = if floor == snapshot.state.current_floor {
            if snapshot.state.doors_open { "[ ]" } else { "[#]" }
        } else {
            ""
        };
        let up = snapshot.hall_requests.contains(&(floor, Dirn::Up));
        let down = snapshot.hall_requests.contains(&(floor, Dirn::Down));
        let cab = snapshot.cab_requests.contains(&floor);

        table.add_row(Row::new(vec![
            Cell::new(&floor.to_string()),
            Cell::new(cabin),
            Cell::new(if up { "●" } else { "" }),
            Cell::new(if down { "●" } else { "" }),
            Cell::new(if cab { "●" } else { "" }),
        ]));
    }
    table
}

/// Logs a dispatcher snapshot as a header line and a floor table.
///
/// Does nothing if `config::PRINT_STATUS_ON` is false.
pub fn status(snapshot: &DispatcherSnapshot) {
    if !config::toggle(&config::PRINT_STATUS_ON) {
        return;
    }
    println!(
        "{} {} │ {} │ last {}",
        Purple.bold().paint("DISPATCHER"),
        behaviour_label(snapshot.behaviour),
        pad_text(dirn_label(snapshot.state.direction), 7),
        dirn_label(snapshot.last_dirn),
    );
    status_table(snapshot).printstd();
}
