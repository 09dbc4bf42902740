/// Platform families as the catalog labels them on suggestion cards.
///
/// The catalog groups individual consoles into parent families (every
/// PlayStation generation shows a single `playstation` badge), so this enum
/// tracks families rather than hardware. Badges the catalog adds later land
/// in `Other` with their upper-cased code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Pc,
    PlayStation,
    Xbox,
    Nintendo,
    Mac,
    Linux,
    Ios,
    Android,
    Web,
    Other(String),
}

/// Every known family, in the order the catalog usually lists badges.
const KNOWN_PLATFORMS: &[Platform] = &[
    Platform::Pc,
    Platform::PlayStation,
    Platform::Xbox,
    Platform::Nintendo,
    Platform::Mac,
    Platform::Linux,
    Platform::Ios,
    Platform::Android,
    Platform::Web,
];

impl Platform {
    /// Catalog badge code, lower-case (`pc`, `playstation`, ...).
    pub fn short_name(&self) -> &str {
        match self {
            Self::Pc => "pc",
            Self::PlayStation => "playstation",
            Self::Xbox => "xbox",
            Self::Nintendo => "nintendo",
            Self::Mac => "mac",
            Self::Linux => "linux",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
            Self::Other(code) => code,
        }
    }

    /// Upper-case code as written to the output sheet (`PC`, `PLAYSTATION`).
    pub fn code(&self) -> String {
        self.short_name().to_uppercase()
    }

    /// Full display name for the family.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pc => "PC",
            Self::PlayStation => "PlayStation",
            Self::Xbox => "Xbox",
            Self::Nintendo => "Nintendo",
            Self::Mac => "Apple Macintosh",
            Self::Linux => "Linux",
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Web => "Web",
            Self::Other(code) => code,
        }
    }

    /// Accepted spellings besides the badge code (case-insensitive).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Pc => &["pc", "windows", "win"],
            Self::PlayStation => &["playstation", "ps", "psn", "sony"],
            Self::Xbox => &["xbox", "microsoft"],
            Self::Nintendo => &["nintendo", "switch"],
            Self::Mac => &["mac", "macos", "osx", "apple-macintosh"],
            Self::Linux => &["linux"],
            Self::Ios => &["ios", "iphone", "ipad"],
            Self::Android => &["android"],
            Self::Web => &["web", "browser"],
            Self::Other(_) => &[],
        }
    }

    /// Parse a badge code scraped from a card. Unknown codes are kept as
    /// `Other` rather than rejected, so a new catalog badge never drops a card.
    pub fn from_code(code: &str) -> Self {
        code.parse()
            .unwrap_or_else(|_| Self::Other(code.trim().to_lowercase()))
    }

    /// The known families (without `Other`).
    pub fn known() -> &'static [Platform] {
        KNOWN_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error returned when a string cannot be parsed into a known `Platform`.
#[derive(Debug, Clone)]
pub struct PlatformParseError(pub String);

impl std::fmt::Display for PlatformParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown platform: '{}'", self.0)
    }
}

impl std::error::Error for PlatformParseError {}

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Strict parse against the known families and their aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        KNOWN_PLATFORMS
            .iter()
            .find(|p| p.short_name() == lower || p.aliases().contains(&lower.as_str()))
            .cloned()
            .ok_or_else(|| PlatformParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_round_trip() {
        for platform in Platform::known() {
            let parsed: Platform = platform.short_name().parse().unwrap();
            assert_eq!(&parsed, platform);
        }
    }

    #[test]
    fn case_insensitive_parsing() {
        assert_eq!("PC".parse::<Platform>().unwrap(), Platform::Pc);
        assert_eq!("PlayStation".parse::<Platform>().unwrap(), Platform::PlayStation);
        assert_eq!("XBOX".parse::<Platform>().unwrap(), Platform::Xbox);
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!("windows".parse::<Platform>().unwrap(), Platform::Pc);
        assert_eq!("ps".parse::<Platform>().unwrap(), Platform::PlayStation);
        assert_eq!("switch".parse::<Platform>().unwrap(), Platform::Nintendo);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Mac);
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert!("commodore-amiga".parse::<Platform>().is_err());
    }

    #[test]
    fn from_code_keeps_unknown_badges() {
        let p = Platform::from_code("Commodore-Amiga");
        assert_eq!(p, Platform::Other("commodore-amiga".to_string()));
        assert_eq!(p.code(), "COMMODORE-AMIGA");
    }

    #[test]
    fn display_is_upper_case_code() {
        assert_eq!(Platform::Pc.to_string(), "PC");
        assert_eq!(Platform::PlayStation.to_string(), "PLAYSTATION");
    }
}
