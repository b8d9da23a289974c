pub const APP_NAME: &str = "Pixelizer";

pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

pub const DEFAULT_OUTPUT_FILE: &str = "pixelized_output.mp4";

/// Four-character encoding tag handed to the output writer.
pub const DEFAULT_CODEC: &str = "mp4v";

/// Frames between progress lines in the debug log.
pub const PROGRESS_LOG_INTERVAL: u64 = 100;

pub const MENU_LOGO: &[&str] = &[
    "  _____ _          _ _              ",
    " |  __ (_)        | (_)             ",
    " | |__) |__  _____| |_ _______ _ __ ",
    " |  ___/ \\ \\/ / _ \\ | |_  / _ \\ '__|",
    " | |   | |>  <  __/ | |/ /  __/ |   ",
    " |_|   |_/_/\\_\\___|_|_/___\\___|_|   ",
];

pub const MENU_LEVEL_HINT: &str = "5 = chunky, 50 = mild";
