//! Tests for config file discovery and decoding.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::ConfigError;
use super::file::{ConfigLocation, FileFormat, FileLayer};

fn yaml(content: &str) -> FileLayer {
    FileLayer::parse(content, FileFormat::Yaml, Path::new("config.yaml")).unwrap()
}

fn toml(content: &str) -> FileLayer {
    FileLayer::parse(content, FileFormat::Toml, Path::new("config.toml")).unwrap()
}

mod format_detection {
    use super::*;

    #[test]
    fn yaml_extensions() {
        assert_eq!(FileFormat::from_path(Path::new("a.yaml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("a.YML")), Some(FileFormat::Yaml));
    }

    #[test]
    fn toml_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.toml")), Some(FileFormat::Toml));
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.json")), None);
        assert_eq!(FileFormat::from_path(Path::new("config")), None);
    }
}

mod location {
    use super::*;

    #[test]
    fn explicit_path_used_verbatim() {
        let location =
            ConfigLocation::resolve(Some(Path::new("rel/my.yaml")), Some(Path::new("/home/u")))
                .unwrap();

        assert!(location.is_explicit());
        assert_eq!(location.path(), Path::new("rel/my.yaml"));
    }

    #[test]
    fn default_path_under_home() {
        let location = ConfigLocation::resolve(None, Some(Path::new("/home/u"))).unwrap();

        assert!(!location.is_explicit());
        assert_eq!(
            location.path(),
            PathBuf::from("/home/u").join(".falcoctl").join("config.yaml")
        );
    }

    #[test]
    fn no_home_without_explicit_path_is_error() {
        let result = ConfigLocation::resolve(None, None);
        assert!(matches!(result, Err(ConfigError::HomeDirUnavailable)));
    }

    #[test]
    fn no_home_with_explicit_path_is_fine() {
        let result = ConfigLocation::resolve(Some(Path::new("x.yaml")), None);
        assert!(result.is_ok());
    }
}

mod loading {
    use super::*;

    #[test]
    fn missing_default_file_is_empty_layer() {
        let home = TempDir::new().unwrap();
        let location = ConfigLocation::resolve(None, Some(home.path())).unwrap();

        let layer = location.load().unwrap();

        assert!(layer.is_empty());
        assert!(layer.path().is_none());
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let location = ConfigLocation::Explicit(dir.path().join("absent.yaml"));

        assert!(matches!(location.load(), Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn loads_default_file() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".falcoctl")).unwrap();
        fs::write(
            home.path().join(".falcoctl/config.yaml"),
            "registry-url: https://example.test\n",
        )
        .unwrap();
        let location = ConfigLocation::resolve(None, Some(home.path())).unwrap();

        let layer = location.load().unwrap();

        assert_eq!(layer.get("registry-url"), Some("https://example.test"));
        assert_eq!(layer.path(), Some(location.path()));
    }

    #[test]
    fn loads_explicit_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("falcoctl.toml");
        fs::write(&path, "limit = 5\nnamespace = \"ops\"\n").unwrap();

        let layer = ConfigLocation::Explicit(path).load().unwrap();

        assert_eq!(layer.get("limit"), Some("5"));
        assert_eq!(layer.get("namespace"), Some("ops"));
    }

    #[test]
    fn malformed_default_file_is_error() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".falcoctl")).unwrap();
        fs::write(home.path().join(".falcoctl/config.yaml"), "a: [b").unwrap();
        let location = ConfigLocation::resolve(None, Some(home.path())).unwrap();

        assert!(matches!(location.load(), Err(ConfigError::YamlParse { .. })));
    }

    #[test]
    fn unsupported_explicit_format_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "limit=5").unwrap();

        let result = ConfigLocation::Explicit(path).load();

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn directory_as_explicit_path_is_error() {
        let dir = TempDir::new().unwrap();
        let location = ConfigLocation::Explicit(dir.path().to_path_buf());

        assert!(matches!(location.load(), Err(ConfigError::FileRead { .. })));
    }
}

mod yaml_decoding {
    use super::*;

    #[test]
    fn scalars_become_strings() {
        let layer = yaml("limit: 5\nforce: true\nnamespace: ops\nratio: 0.5\n");

        assert_eq!(layer.get("limit"), Some("5"));
        assert_eq!(layer.get("force"), Some("true"));
        assert_eq!(layer.get("namespace"), Some("ops"));
        assert_eq!(layer.get("ratio"), Some("0.5"));
    }

    #[test]
    fn sequences_are_comma_joined() {
        let layer = yaml("tags: [a, b, 3]\n");
        assert_eq!(layer.get("tags"), Some("a,b,3"));
    }

    #[test]
    fn nested_mappings_are_flattened() {
        let layer = yaml("registry:\n  auth:\n    user: me\n");
        assert_eq!(layer.get("registry.auth.user"), Some("me"));
    }

    #[test]
    fn nulls_are_skipped() {
        let layer = yaml("limit: ~\n");
        assert_eq!(layer.get("limit"), None);
        assert!(layer.is_empty());
    }

    #[test]
    fn keys_are_case_insensitive() {
        let layer = yaml("Registry-URL: x\n");
        assert_eq!(layer.get("registry-url"), Some("x"));
    }

    #[test]
    fn empty_document_is_empty_layer() {
        assert!(yaml("").is_empty());
        assert!(yaml("# only a comment\n").is_empty());
    }

    #[test]
    fn top_level_sequence_is_rejected() {
        let result = FileLayer::parse("- a\n- b\n", FileFormat::Yaml, Path::new("c.yaml"));
        assert!(matches!(result, Err(ConfigError::NotAMapping { .. })));
    }
}

mod toml_decoding {
    use super::*;

    #[test]
    fn scalars_become_strings() {
        let layer = toml("limit = 5\nforce = true\nnamespace = \"ops\"\n");

        assert_eq!(layer.get("limit"), Some("5"));
        assert_eq!(layer.get("force"), Some("true"));
        assert_eq!(layer.get("namespace"), Some("ops"));
    }

    #[test]
    fn arrays_are_comma_joined() {
        let layer = toml("tags = [\"a\", \"b\"]\n");
        assert_eq!(layer.get("tags"), Some("a,b"));
    }

    #[test]
    fn tables_are_flattened() {
        let layer = toml("[registry]\nurl = \"https://example.test\"\n");
        assert_eq!(layer.get("registry.url"), Some("https://example.test"));
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let result = FileLayer::parse("limit = ", FileFormat::Toml, Path::new("c.toml"));
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }
}

mod from_pairs {
    use super::*;

    #[test]
    fn lowercases_keys() {
        let layer = FileLayer::from_pairs([("LIMIT", "3")]);

        assert_eq!(layer.get("limit"), Some("3"));
        assert_eq!(layer.len(), 1);
    }
}

mod diagnostics {
    use super::super::log_capture::capture;
    use super::*;

    #[test]
    fn names_the_file_in_use() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("falcoctl.yaml");
        fs::write(&path, "limit: 5\n").unwrap();

        let (result, logs) = capture(|| ConfigLocation::Explicit(path.clone()).load());

        assert!(result.is_ok());
        assert!(logs.contains("INFO"));
        assert!(logs.contains("using config file"));
        assert!(logs.contains(&path.display().to_string()));
    }

    #[test]
    fn notes_missing_default_file() {
        let home = TempDir::new().unwrap();
        let location = ConfigLocation::resolve(None, Some(home.path())).unwrap();

        let (result, logs) = capture(|| location.load());

        assert!(result.unwrap().is_empty());
        assert!(logs.contains("running without a configuration file"));
        assert!(!logs.contains("using config file"));
    }
}
