use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::MagickError;
use crate::utils::verbose_println;

/// Format string that makes `convert` print the 8-bit RGB value of a 1x1 crop
const RGB_FORMAT: &str = "%[fx:floor(255*u.r)],%[fx:floor(255*u.g)],%[fx:floor(255*u.b)]";

/// An 8-bit RGB triple sampled from an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Euclidean distance between two colors in RGB space
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = self.0 as f64 - other.0 as f64;
        let dg = self.1 as f64 - other.1 as f64;
        let db = self.2 as f64 - other.2 as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

/// Argument list for a single ImageMagick invocation.
///
/// Arguments are passed to the process directly (no shell), so the grouping
/// parentheses used by the derivative commands are plain `(` / `)` tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn as_slice(&self) -> &[OsString] {
        &self.args
    }

    /// Lossy string form, used for logging and tests
    pub fn to_string_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// Handle on the ImageMagick command-line program.
///
/// Every pixel operation in this crate goes through here. The handle is cheap
/// to clone and carries no state beyond the program path and verbosity.
#[derive(Debug, Clone)]
pub struct MagickTool {
    program: PathBuf,
    verbose: bool,
}

impl MagickTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            verbose: false,
        }
    }

    /// Pick 'convert' when it answers `-version`, else 'magick' (ImageMagick v7 only installs).
    ///
    /// `convert` keeps the v6 argument parser, which the grouped derivative
    /// commands are written against.
    pub fn detect() -> Self {
        if probe("convert") {
            Self::new("convert")
        } else {
            Self::new("magick")
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check if the configured program can be launched
    pub fn is_available(&self) -> bool {
        probe(&self.program)
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn execute(&self, invocation: &Invocation) -> Result<Vec<u8>, MagickError> {
        verbose_println(
            self.verbose,
            &format!(
                "{} {}",
                self.program.display(),
                invocation.to_string_lossy().join(" ")
            ),
        );

        let output = Command::new(&self.program)
            .args(invocation.as_slice())
            .output()
            .map_err(|source| MagickError::Spawn {
                program: self.program_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(MagickError::Failed {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    /// Run an invocation for its side effects (writing an output file)
    pub fn run(&self, invocation: &Invocation) -> Result<(), MagickError> {
        self.execute(invocation).map(|_| ())
    }

    /// Run an invocation and return its trimmed stdout
    pub fn query(&self, invocation: &Invocation) -> Result<String, MagickError> {
        let stdout = self.execute(invocation)?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    /// Return width of image in integer number of pixels
    pub fn width(&self, path: &Path) -> Result<u32, MagickError> {
        let out = self.query(&info_query(path, "%w"))?;
        parse_dimension(&self.program_name(), "width", &out)
    }

    /// Return height of image in integer number of pixels
    pub fn height(&self, path: &Path) -> Result<u32, MagickError> {
        let out = self.query(&info_query(path, "%h"))?;
        parse_dimension(&self.program_name(), "height", &out)
    }

    /// Width and height, each queried fresh from disk
    pub fn size(&self, path: &Path) -> Result<(u32, u32), MagickError> {
        Ok((self.width(path)?, self.height(path)?))
    }

    /// RGB value at `(x, y)`.
    ///
    /// The coordinate must lie inside the image; nothing checks it here and
    /// ImageMagick's answer for an out-of-range crop is whatever it prints.
    pub fn rgb_at(&self, path: &Path, x: u32, y: u32) -> Result<Rgb, MagickError> {
        let out = self.query(&pixel_query(path, x, y))?;
        parse_rgb(&self.program_name(), &out)
    }
}

fn probe(program: impl AsRef<OsStr>) -> bool {
    Command::new(program)
        .arg("-version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// `<path> -ping -format <fmt> info:`
pub fn info_query(path: &Path, format: &str) -> Invocation {
    Invocation::new()
        .arg(path)
        .args(["-ping", "-format", format, "info:"])
}

/// `<path>[1x1+x+y] -format <rgb> info:`
pub fn pixel_query(path: &Path, x: u32, y: u32) -> Invocation {
    let mut cropped = path.as_os_str().to_os_string();
    cropped.push(format!("[1x1+{}+{}]", x, y));
    Invocation::new()
        .arg(cropped)
        .args(["-format", RGB_FORMAT, "info:"])
}

fn parse_dimension(program: &str, what: &'static str, output: &str) -> Result<u32, MagickError> {
    output
        .trim()
        .parse::<u32>()
        .map_err(|_| MagickError::UnexpectedOutput {
            program: program.to_string(),
            what,
            output: output.to_string(),
        })
}

fn parse_rgb(program: &str, output: &str) -> Result<Rgb, MagickError> {
    let bad = || MagickError::UnexpectedOutput {
        program: program.to_string(),
        what: "rgb",
        output: output.to_string(),
    };

    let channels = output
        .trim()
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| bad())?;

    match channels.as_slice() {
        [r, g, b] => Ok(Rgb(*r, *g, *b)),
        _ => Err(bad()),
    }
}
