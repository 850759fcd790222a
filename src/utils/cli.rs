//! Command-line argument parsing and help for faro.
//!
//! This module handles all CLI flag parsing used at startup.
//!
//! When invoked with no args/flags (fo), faro simply launches the TUI.

pub(crate) enum CliAction {
    RunApp,
    RunAppAtPath(String),
    Exit,
}

pub(crate) fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        return CliAction::RunApp;
    }

    if args.len() > 2 {
        eprintln!("Error: faro accepts only one argument at a time.");
        eprintln!("Usage: fo [PATH] or fo [OPTION]");
        return CliAction::Exit;
    }

    match args[1].as_str() {
        "--version" | "-v" => {
            print_version();
            CliAction::Exit
        }
        "-h" | "--help" => {
            print_help();
            CliAction::Exit
        }
        "--keybinds" | "--keybind" | "--key" => {
            print_keybinds();
            CliAction::Exit
        }
        arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
            CliAction::RunAppAtPath(arg.to_string())
        }
        arg => {
            eprintln!("Unknown argument: {}", arg);
            eprintln!("Try --help for available options");
            CliAction::Exit
        }
    }
}

fn print_version() {
    println!("faro {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"faro - A tabbed terminal file browser written in Rust

USAGE:
  fo [PATH]

PATH:
  Directory to open (defaults to current directory)

OPTIONS:
      --keybinds          Display all the default keybinds
  -h, --help              Print help information
  -v, --version           Display the current installed version of faro

ENVIRONMENT:
  FARO_CONFIG             Override the default config path
"#
    );
}

const KEYBINDS_TEXT: &str = r##"
=========================
 Key Bindings
=========================
  quit                      ["q"]
  go_up                     ["up"]
  go_down                   ["down"]
  go_parent                 ["left", "h"]
  open / enter dir          ["enter", "right"]
  history_back              ["pageup"]
  history_forward           ["pagedown"]
  toggle_marker             ["space"]
  copy                      ["c"]
  cut                       ["x"]
  paste                     ["v"]
  delete                    ["d"]
  toggle_hidden             ["."]
  cycle_sort                ["s"]
  refresh                   ["f5"]
  find                      ["/", "f6"]
  tab_next                  ["t", "tab"]
  tab_prev                  ["T"]
  tab_close                 ["w"]

  While searching:
    type                    extend the query
    backspace               shrink the query
    enter                   open the selected result
    esc                     leave search mode
"##;

fn print_keybinds() {
    println!("{}", KEYBINDS_TEXT);
}
