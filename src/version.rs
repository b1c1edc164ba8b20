//! OpenAL implementation version report.
//!
//! `AL_VERSION` carries the AL version first and, for OpenAL Soft, the
//! vendor's own version after it: `"1.1 ALSOFT 1.23.1"`.

use std::fmt;

use serde::Serialize;

use crate::constants::{AL_RENDERER, AL_VENDOR, AL_VERSION};
use crate::context::AudioBindings;
use crate::dispatch::Al;
use crate::error::BridgeError;

/// `major.minor.sub` version number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
    pub sub: u32,
}

impl VersionNumber {
    pub const ZERO: VersionNumber = VersionNumber {
        major: 0,
        minor: 0,
        sub: 0,
    };

    pub fn new(major: u32, minor: u32, sub: u32) -> Self {
        Self { major, minor, sub }
    }

    /// First version number in `text`, zero if there is none.
    pub fn parse(text: &str) -> Self {
        parse_prefix(text).map_or(Self::ZERO, |parsed| parsed.version)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.sub)
    }
}

struct ParsedVersion {
    version: VersionNumber,
    /// Number of components present in the text
    components: usize,
    /// Byte offset just past the version
    end: usize,
}

/// Parse the first version number in `text`.
///
/// Leading non-digits are skipped. Components are separated by one character
/// that is neither a digit nor whitespace.
fn parse_prefix(text: &str) -> Option<ParsedVersion> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let mut values = [0u32; 3];
    let mut components = 0;
    let mut pos = start;
    while components < 3 {
        let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        values[components] = text[pos..pos + digits].parse().unwrap_or(u32::MAX);
        components += 1;
        pos += digits;

        let separated = bytes
            .get(pos)
            .is_some_and(|b| !b.is_ascii_digit() && !b.is_ascii_whitespace());
        let followed_by_digit = bytes.get(pos + 1).is_some_and(u8::is_ascii_digit);
        if components == 3 || !(separated && followed_by_digit) {
            break;
        }
        pos += 1;
    }

    Some(ParsedVersion {
        version: VersionNumber::new(values[0], values[1], values[2]),
        components,
        end: pos,
    })
}

/// Vendor version following the leading AL version, zero if absent.
///
/// Only a version with at least a major and a minor component counts.
pub fn vendor_version(version_string: &str) -> VersionNumber {
    let Some(al_version) = parse_prefix(version_string) else {
        return VersionNumber::ZERO;
    };
    let mut rest = version_string[al_version.end..].trim();
    while let Some(candidate) = parse_prefix(rest) {
        if candidate.components >= 2 {
            return candidate.version;
        }
        rest = rest[candidate.end..].trim();
    }
    VersionNumber::ZERO
}

/// Vendor, renderer and versions of the current AL context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlVersion {
    pub vendor: String,
    pub renderer: String,
    pub version: VersionNumber,
    /// Raw `AL_VERSION` string
    pub version_string: String,
    pub vendor_version: VersionNumber,
}

impl AlVersion {
    /// Query the current context through `al`.
    pub fn query(al: &Al) -> Result<Self, BridgeError> {
        let vendor = al.get_string(AL_VENDOR)?.unwrap_or_default();
        let renderer = al.get_string(AL_RENDERER)?.unwrap_or_default();
        let version_string = al.get_string(AL_VERSION)?.unwrap_or_default();
        Ok(Self {
            vendor,
            renderer,
            version: VersionNumber::parse(&version_string),
            vendor_version: vendor_version(&version_string),
            version_string,
        })
    }

    /// Open the default device with a temporary context and query it.
    ///
    /// The device and context are released again, also when the query or a
    /// release step fails; the first error is reported.
    pub fn probe(bindings: &AudioBindings) -> Result<Self, BridgeError> {
        let alc = bindings.alc();
        let device = alc.open_device(None)?.ok_or_else(|| BridgeError::DeviceUnavailable {
            reason: "default device could not be opened".to_string(),
        })?;

        let context = match alc.create_context(device, None) {
            Ok(Some(context)) => context,
            Ok(None) => {
                alc.close_device(device)?;
                return Err(BridgeError::DeviceUnavailable {
                    reason: "no context could be created on the default device".to_string(),
                });
            }
            Err(err) => {
                if let Err(close_err) = alc.close_device(device) {
                    log::warn!("[Version] Closing the default device failed: {}", close_err);
                }
                return Err(err);
            }
        };

        let result = bindings
            .make_context_current(Some(context))
            .and_then(|_| Self::query(&bindings.al()));

        let release = [
            alc.make_context_current(None).map(drop),
            alc.destroy_context(context),
            alc.close_device(device).map(drop),
        ];
        let version = result?;
        release.into_iter().collect::<Result<(), _>>()?;
        Ok(version)
    }

    /// One line per field.
    pub fn to_multiline_string(&self) -> String {
        format!(
            "AL_VENDOR      {}\nAL_RENDERER    {}\nAL_VERSION     {} ({})\nAL_VENDOR_VERS {}\n",
            self.vendor, self.renderer, self.version, self.version_string, self.vendor_version
        )
    }
}

impl fmt::Display for AlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vendor {}, renderer {}, version {} ({}), vendorVersion {}",
            self.vendor, self.renderer, self.version, self.version_string, self.vendor_version
        )
    }
}
