use crate::platform::Platform;

pub const DEFAULT_INSTALL_MARKER: &str = "ImageMagick";
pub const DEFAULT_FALLBACK_LAUNCHER: &str = "magick";

/// Where the search-and-filter strategy looks and what it falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Leading name of the installation folder a candidate must live under.
    pub install_marker: String,
    /// Unified launcher searched for when no per-tool binary is found.
    pub fallback_launcher: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            install_marker: DEFAULT_INSTALL_MARKER.to_string(),
            fallback_launcher: DEFAULT_FALLBACK_LAUNCHER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Use the program name verbatim and let the shell find it.
    Passthrough,
    /// Search the path and keep only candidates in the installation folder.
    SearchAndFilter(SearchSettings),
}

impl ResolveStrategy {
    pub fn for_platform(platform: Platform, settings: SearchSettings) -> Self {
        match platform {
            Platform::Windows => ResolveStrategy::SearchAndFilter(settings),
            Platform::Unix => ResolveStrategy::Passthrough,
        }
    }
}

/// Split `where` output into candidate paths, preserving order.
pub fn parse_candidates(output: &str) -> Vec<&str> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether a directory in `path` starts with `marker`.
///
/// Both separators are accepted and the comparison ignores ASCII case, so
/// `C:\Program Files\ImageMagick-7.1.1-Q16\convert.exe` matches `ImageMagick`.
/// The file name itself is never considered.
pub fn is_in_install_folder(path: &str, marker: &str) -> bool {
    let marker = marker.to_ascii_lowercase();
    let mut components: Vec<&str> = path.split(['\\', '/']).collect();
    components.pop();

    components
        .iter()
        .any(|dir| dir.to_ascii_lowercase().starts_with(&marker))
}

/// First candidate living under the installation folder.
pub fn select_candidate<'a>(candidates: &[&'a str], marker: &str) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|candidate| is_in_install_folder(candidate, marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_for_platform() {
        assert_eq!(
            ResolveStrategy::for_platform(Platform::Unix, SearchSettings::default()),
            ResolveStrategy::Passthrough
        );
        assert_eq!(
            ResolveStrategy::for_platform(Platform::Windows, SearchSettings::default()),
            ResolveStrategy::SearchAndFilter(SearchSettings::default())
        );
    }

    #[test]
    fn test_parse_candidates_handles_crlf() {
        let output = "c:\\System32\\convert.exe\r\nc:\\ProgramFiles\\ImageMagick\\Convert.exe\r\n\r\n";
        assert_eq!(
            parse_candidates(output),
            vec![
                "c:\\System32\\convert.exe",
                "c:\\ProgramFiles\\ImageMagick\\Convert.exe"
            ]
        );
    }

    #[test]
    fn test_parse_candidates_empty() {
        assert!(parse_candidates("").is_empty());
        assert!(parse_candidates("\r\n\n").is_empty());
    }

    #[test]
    fn test_is_in_install_folder() {
        assert!(is_in_install_folder(
            "c:\\ProgramFiles\\ImageMagick\\Convert.exe",
            "ImageMagick"
        ));
        assert!(is_in_install_folder(
            "C:/Program Files/ImageMagick-7.1.1-Q16-HDRI/magick.exe",
            "ImageMagick"
        ));
        assert!(is_in_install_folder(
            "c:\\programfiles\\imagemagick\\convert.exe",
            "ImageMagick"
        ));
    }

    #[test]
    fn test_is_in_install_folder_rejects_system_paths() {
        assert!(!is_in_install_folder(
            "C:\\Windows\\System32\\convert.exe",
            "ImageMagick"
        ));
        // Marker only in the file name
        assert!(!is_in_install_folder("C:\\tools\\ImageMagick.exe", "ImageMagick"));
    }

    #[test]
    fn test_select_candidate_prefers_install_folder() {
        let candidates = [
            "c:\\System32\\convert.exe",
            "c:\\ProgramFiles\\ImageMagick\\Convert.exe",
        ];
        assert_eq!(
            select_candidate(&candidates, "ImageMagick"),
            Some("c:\\ProgramFiles\\ImageMagick\\Convert.exe")
        );
    }

    #[test]
    fn test_select_candidate_none() {
        let candidates = ["c:\\System32\\convert.exe"];
        assert_eq!(select_candidate(&candidates, "ImageMagick"), None);
    }
}
