//! Fixed settings for the typeforge tools.

/// Extensions the converter accepts.
pub const CONVERT_EXTENSIONS: &[&str] = &["ttf", "otf", "woff", "woff2"];

/// Extensions the weight instancer accepts.
pub const INSTANCE_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// Extensions the merge tools accept.
pub const MERGE_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// Lowest weight a user may request.
pub const MIN_WEIGHT: u16 = 100;

/// Highest weight a user may request.
pub const MAX_WEIGHT: u16 = 900;

/// Weights offered when the user selects all presets.
pub const PRESET_WEIGHTS: [u16; 9] = [100, 200, 300, 400, 500, 600, 700, 800, 900];

/// Minimum number of fonts a merge needs.
pub const MIN_MERGE_INPUTS: usize = 2;

/// External merge executable used when none is given.
pub const DEFAULT_MERGER: &str = "pyftmerge";

/// Flag prefix that passes the output path to the external merger.
pub const MERGER_OUTPUT_FLAG: &str = "--output-file=";

/// `chrono` format of the timestamp in default converter output names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Program name shown at the top of the about text.
pub const TOOL_NAME: &str = "typeforge";

/// Links shown by `about`.
pub const PROJECT_LINKS: &[(&str, &str)] = &[
    ("GitHub", "https://github.com/LANMIN-X/FontConverter_GUI/"),
    ("Find fonts", "https://zfont.cn"),
];
