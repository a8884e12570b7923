use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "flashprint",
    bin_name = "flashprint",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Study cards with duplex print layout", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $FLASHPRINT_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Core,
    Selection,
    Data,
    Print,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Core => "Core Commands:",
            CommandGroup::Selection => "Selection Commands:",
            CommandGroup::Data => "Data Commands:",
            CommandGroup::Print => "Printing:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "add" | "list" | "edit" => Some(CommandGroup::Core),
            "select" | "unselect" | "select-all" | "unselect-all" | "select-unprinted" => {
                Some(CommandGroup::Selection)
            }
            "delete" | "delete-selected" | "import" | "export" => Some(CommandGroup::Data),
            "print" => Some(CommandGroup::Print),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Core,
            CommandGroup::Selection,
            CommandGroup::Data,
            CommandGroup::Print,
            CommandGroup::Misc,
        ]
    }
}

/// Returns the custom grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("flashprint {version}\n"));
    output.push_str("Study cards with duplex print layout\n");
    output.push('\n');
    output.push_str("Usage: flashprint [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<17} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --data-dir <DIR>  Data directory\n");
    output.push_str("  -v, --verbose         Verbose output\n");
    output.push_str("  -h, --help            Print help\n");
    output.push_str("  -V, --version         Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name, falling back to the grouped help.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();
    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

/// Prints help for the parsed subcommand using clap's built-in rendering
pub fn print_subcommand_help(command: &Option<Commands>) {
    match command.as_ref().map(Commands::name) {
        Some(name) => print_help_for_command(name),
        None => print_grouped_help(),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Selection(SelectionCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Print(PrintCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Core(c) => match c {
                CoreCommands::Add { .. } => "add",
                CoreCommands::List { .. } => "list",
                CoreCommands::Edit { .. } => "edit",
            },
            Commands::Selection(c) => match c {
                SelectionCommands::Select { .. } => "select",
                SelectionCommands::Unselect { .. } => "unselect",
                SelectionCommands::SelectAll { .. } => "select-all",
                SelectionCommands::UnselectAll => "unselect-all",
                SelectionCommands::SelectUnprinted => "select-unprinted",
            },
            Commands::Data(c) => match c {
                DataCommands::Delete { .. } => "delete",
                DataCommands::DeleteSelected => "delete-selected",
                DataCommands::Import { .. } => "import",
                DataCommands::Export { .. } => "export",
            },
            Commands::Print(c) => match c {
                PrintCommands::Print { .. } => "print",
            },
            Commands::Misc(c) => match c {
                MiscCommands::Config { .. } => "config",
                MiscCommands::Help { .. } => "help",
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Add a card
    #[command(alias = "n", display_order = 1)]
    Add {
        /// Lesson the card belongs to
        lesson: String,

        /// Front text
        front: String,

        /// Back text (auto-filled by translation when available)
        back: Option<String>,
    },

    /// List cards
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Only cards whose lesson, front or back contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only selected cards (ignored when searching)
        #[arg(long)]
        selected: bool,
    },

    /// Change one field of a card
    #[command(alias = "e", display_order = 3)]
    Edit {
        /// Card id
        id: u64,

        /// Field to change: lesson, front, back or copies
        field: String,

        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SelectionCommands {
    /// Select cards for printing
    #[command(display_order = 10)]
    Select {
        /// Card ids or ranges (e.g. 1 3 5-8)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Remove cards from the print selection
    #[command(display_order = 11)]
    Unselect {
        /// Card ids or ranges (e.g. 1 3 5-8)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Select every card in a view
    #[command(display_order = 12)]
    SelectAll {
        /// Only cards matching this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Clear the print selection
    #[command(display_order = 13)]
    UnselectAll,

    /// Select exactly the cards that were never printed
    #[command(display_order = 14)]
    SelectUnprinted,
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Delete a card
    #[command(alias = "rm", display_order = 20)]
    Delete {
        /// Card id
        id: u64,
    },

    /// Delete every selected card
    #[command(display_order = 21)]
    DeleteSelected,

    /// Import cards from a CSV file with lesson, front and back columns
    #[command(display_order = 22)]
    Import {
        /// CSV file to read
        path: PathBuf,
    },

    /// Export all cards to a CSV file
    #[command(display_order = 23)]
    Export {
        /// CSV file to write
        path: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrintCommands {
    /// Render selected cards as front/back SVG pages
    #[command(display_order = 30)]
    Print {
        /// Output directory for the pages
        #[arg(short, long, value_name = "DIR", default_value = "flashprint-pages")]
        out: PathBuf,

        /// Render only; do not record the cards as printed
        #[arg(long)]
        preview: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Get or set configuration
    #[command(display_order = 40)]
    Config {
        /// Configuration key (e.g. cards_per_page)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for flashprint or a subcommand
    #[command(display_order = 41)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}
