use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::RegexBuilder;
use serde::Serialize;
use serde_yaml::Value as Yaml;
use walkdir::WalkDir;

// Well-known top-level config files, checked in this order before packages/.
const TOP_LEVEL_CONFIGS: [&str; 5] = [
    "configuration.yaml",
    "automations.yaml",
    "scripts.yaml",
    "scenes.yaml",
    "ui-lovelace.yaml",
];

const AREAS_FILE: &str = "areas.yaml";

/// One matching line from a repository search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub file: String,
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutomationSummary {
    pub id: String,
    pub alias: String,
    pub triggers: Vec<String>,
    pub file: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptSummary {
    pub name: String,
    pub alias: String,
    pub actions: Vec<String>,
    pub file: String,
}

/// Per-package counts; `parts` is `None` when the file is empty or unparsable.
#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub name: String,
    pub parts: Option<Vec<String>>,
}

/// Read-only view of a Home Assistant configuration repository.
pub struct ConfigRepo {
    root: PathBuf,
}

impl ConfigRepo {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a user-supplied filename: as given, under `packages/`, and with
    /// a `.yaml` suffix appended.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let mut candidates = vec![
            self.root.join(filename),
            self.root.join("packages").join(filename),
        ];
        if !filename.ends_with(".yaml") {
            let with_suffix = format!("{filename}.yaml");
            candidates.push(self.root.join(&with_suffix));
            candidates.push(self.root.join("packages").join(&with_suffix));
        }
        candidates.into_iter().find(|p| p.is_file())
    }

    /// Raw file content; `None` when the name resolves to nothing.
    pub fn read_raw(&self, filename: &str) -> Result<Option<String>> {
        match self.resolve(filename) {
            Some(path) => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Ok(Some(content))
            }
            None => Ok(None),
        }
    }

    /// All config files: existing well-known top-level files plus every
    /// `*.yaml` directly under `packages/`, sorted.
    pub fn config_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = TOP_LEVEL_CONFIGS
            .iter()
            .map(|name| self.root.join(name))
            .filter(|p| p.is_file())
            .collect();

        let pkg_dir = self.root.join("packages");
        if pkg_dir.is_dir() {
            let mut packages: Vec<PathBuf> = fs::read_dir(&pkg_dir)
                .into_iter()
                .flatten()
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "yaml"))
                .collect();
            packages.sort();
            files.extend(packages);
        }
        files
    }

    /// Repo-relative display path.
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    /// Case-insensitive regex search over every text file in the repository.
    ///
    /// Hidden entries are skipped; files that do not read as UTF-8 are treated
    /// as binary and ignored.
    pub fn search(&self, pattern: &str) -> Result<Vec<SearchHit>> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("invalid search pattern '{pattern}'"))?;

        let mut hits = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| name.starts_with('.'))
            });
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(%error, "skipping unreadable entry during search");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(content) = fs::read_to_string(entry.path()) else {
                continue;
            };
            for (index, line) in content.lines().enumerate() {
                if regex.is_match(line) {
                    hits.push(SearchHit {
                        file: self.relative(entry.path()),
                        line: index + 1,
                        text: line.trim().to_string(),
                    });
                }
            }
        }
        Ok(hits)
    }

    /// Every automation across all config files, with trigger summaries.
    pub fn extract_automations(&self) -> Vec<AutomationSummary> {
        let mut automations = Vec::new();
        for path in self.config_files() {
            let Some(doc) = self.parse_file(&path) else {
                continue;
            };
            let rel = self.relative(&path);
            collect_automations(&doc, &rel, &mut automations);
        }
        automations
    }

    /// Every script across scripts.yaml and package files.
    pub fn extract_scripts(&self) -> Vec<ScriptSummary> {
        let mut scripts = Vec::new();
        for path in self.config_files() {
            let Some(doc) = self.parse_file(&path) else {
                continue;
            };
            let rel = self.relative(&path);

            // scripts.yaml is a bare name → body mapping; elsewhere scripts
            // live under a `script:` key, with the whole document as fallback.
            let section = if rel == "scripts.yaml" {
                &doc
            } else {
                doc.get("script").unwrap_or(&doc)
            };
            let Some(section) = section.as_mapping() else {
                continue;
            };

            for (name, body) in section {
                let Some(name) = name.as_str() else {
                    continue;
                };
                let Some(sequence) = body.get("sequence").and_then(Yaml::as_sequence) else {
                    continue;
                };
                scripts.push(ScriptSummary {
                    name: name.to_string(),
                    alias: yaml_str(body.get("alias")),
                    actions: summarize_actions(sequence),
                    file: rel.clone(),
                });
            }
        }
        scripts
    }

    /// Per-package counts of automations, helpers, and scripts.
    pub fn package_summaries(&self) -> Option<Vec<PackageSummary>> {
        let pkg_dir = self.root.join("packages");
        if !pkg_dir.is_dir() {
            return None;
        }

        let mut summaries = Vec::new();
        for path in self.config_files() {
            if path.parent() != Some(pkg_dir.as_path()) {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let Some(doc) = self.parse_file(&path) else {
                summaries.push(PackageSummary { name, parts: None });
                continue;
            };

            let mut parts = Vec::new();
            if let Some(autos) = doc.get("automation").and_then(Yaml::as_sequence) {
                parts.push(format!("{} automation(s)", autos.len()));
            }
            for key in ["input_number", "input_boolean", "input_button", "input_select", "timer"] {
                if let Some(section) = doc.get(key).and_then(Yaml::as_mapping) {
                    parts.push(format!("{} {}", section.len(), key));
                }
            }
            if let Some(script) = doc.get("script").and_then(Yaml::as_mapping) {
                parts.push(format!("{} script(s)", script.len()));
            }
            summaries.push(PackageSummary {
                name,
                parts: Some(parts),
            });
        }
        Some(summaries)
    }

    /// Area name → entity-id prefixes, from `areas.yaml` at the repo root.
    /// `None` when the repo does not carry the mapping.
    pub fn area_map(&self) -> Result<Option<BTreeMap<String, Vec<String>>>> {
        let path = self.root.join(AREAS_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let map: BTreeMap<String, Vec<String>> = serde_yaml::from_str(&content)
            .with_context(|| format!("{AREAS_FILE} is not a mapping of area name to entity id prefixes"))?;
        Ok(Some(map))
    }

    fn parse_file(&self, path: &Path) -> Option<Yaml> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "failed to read config file");
                return None;
            }
        };
        match serde_yaml::from_str::<Yaml>(&content) {
            Ok(Yaml::Null) => None,
            Ok(doc) => Some(doc),
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "YAML parse error");
                None
            }
        }
    }
}

/// Normalize an area name the way `areas.yaml` keys are written.
pub fn normalize_area(area: &str) -> String {
    area.to_lowercase().replace(' ', "_").replace('\'', "")
}

// Recursively find automation blocks: `automation:` lists inside mappings,
// plus bare top-level lists of aliased entries (automations.yaml format).
fn collect_automations(doc: &Yaml, file: &str, out: &mut Vec<AutomationSummary>) {
    match doc {
        Yaml::Mapping(mapping) => {
            if let Some(list) = doc.get("automation").and_then(Yaml::as_sequence) {
                for item in list {
                    if item.as_mapping().is_some() {
                        out.push(summarize_automation(item, file));
                    }
                }
            }
            for value in mapping.values() {
                if value.as_mapping().is_some() {
                    collect_automations(value, file, out);
                }
            }
        }
        Yaml::Sequence(items) => {
            for item in items {
                if item.is_mapping() && item.get("alias").is_some() {
                    out.push(summarize_automation(item, file));
                }
            }
        }
        _ => {}
    }
}

fn summarize_automation(auto: &Yaml, file: &str) -> AutomationSummary {
    // HA accepts both the legacy `trigger` key and the 2024-style `triggers`.
    let triggers = auto
        .get("triggers")
        .or_else(|| auto.get("trigger"))
        .cloned()
        .unwrap_or(Yaml::Null);
    let triggers = match triggers {
        Yaml::Sequence(items) => items,
        Yaml::Null => Vec::new(),
        single => vec![single],
    };

    let summaries = triggers
        .iter()
        .filter_map(|t| {
            if !t.is_mapping() {
                return None;
            }
            let mut parts = Vec::new();
            for key in ["platform", "trigger", "event"] {
                if let Some(value) = t.get(key) {
                    parts.push(yaml_scalar(value));
                }
            }
            if let Some(at) = t.get("at") {
                parts.push(format!("at {}", yaml_scalar(at)));
            }
            if let Some(entity_id) = t.get("entity_id") {
                parts.push(match entity_id.as_sequence() {
                    Some(ids) => ids.iter().map(yaml_scalar).collect::<Vec<_>>().join(", "),
                    None => yaml_scalar(entity_id),
                });
            }
            Some(parts.join(" "))
        })
        .collect();

    AutomationSummary {
        id: yaml_str(auto.get("id")),
        alias: yaml_str(auto.get("alias")),
        triggers: summaries,
        file: file.to_string(),
    }
}

fn summarize_actions(sequence: &[Yaml]) -> Vec<String> {
    sequence
        .iter()
        .filter_map(|step| {
            let action = step
                .get("action")
                .or_else(|| step.get("service"))
                .and_then(Yaml::as_str)?;
            let target = step
                .get("target")
                .and_then(|t| t.get("entity_id"))
                .map(|entity_id| match entity_id.as_sequence() {
                    Some(ids) => ids.iter().map(yaml_scalar).collect::<Vec<_>>().join(", "),
                    None => yaml_scalar(entity_id),
                });
            Some(match target {
                Some(entity_id) if !entity_id.is_empty() => format!("{action} → {entity_id}"),
                _ => action.to_string(),
            })
        })
        .collect()
}

fn yaml_str(value: Option<&Yaml>) -> String {
    value.and_then(Yaml::as_str).unwrap_or("").to_string()
}

fn yaml_scalar(value: &Yaml) -> String {
    match value {
        Yaml::String(s) => s.clone(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with(files: &[(&str, &str)]) -> (TempDir, ConfigRepo) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        let repo = ConfigRepo::new(dir.path().to_path_buf());
        (dir, repo)
    }

    #[test]
    fn read_raw_returns_literal_content() {
        let yaml = "input_boolean:\n  quiet_hours:\n    name: Quiet Hours\n";
        let (_dir, repo) = repo_with(&[("configuration.yaml", yaml)]);
        let content = repo.read_raw("configuration.yaml").unwrap().unwrap();
        assert_eq!(content, yaml);
    }

    #[test]
    fn resolve_tries_packages_and_yaml_suffix() {
        let (_dir, repo) = repo_with(&[("packages/house_mode.yaml", "automation: []\n")]);
        assert!(repo.resolve("house_mode").is_some());
        assert!(repo.resolve("house_mode.yaml").is_some());
        assert!(repo.resolve("packages/house_mode.yaml").is_some());
        assert!(repo.resolve("missing").is_none());
    }

    #[test]
    fn search_finds_single_match_with_line_number() {
        let (_dir, repo) = repo_with(&[
            ("configuration.yaml", "homeassistant:\n  name: Home\n"),
            ("packages/lights.yaml", "script:\n  evening:\n    sequence: []\n"),
        ]);
        let hits = repo.search("evening").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file, "packages/lights.yaml");
        assert_eq!(hits[0].line, 2);
        assert_eq!(hits[0].text, "evening:");
    }

    #[test]
    fn search_is_case_insensitive_and_skips_hidden() {
        let (_dir, repo) = repo_with(&[
            ("configuration.yaml", "# Quiet hours config\n"),
            (".storage/secret.yaml", "quiet\n"),
        ]);
        let hits = repo.search("QUIET").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file, "configuration.yaml");
    }

    #[test]
    fn bad_pattern_is_an_error() {
        let (_dir, repo) = repo_with(&[]);
        assert!(repo.search("[unclosed").is_err());
    }

    #[test]
    fn extracts_automations_from_packages_and_top_level_lists() {
        let package = "\
automation:
  - id: '100'
    alias: Porch on at dusk
    trigger:
      - platform: sun
        event: sunset
    action: []
";
        let top_level = "\
- id: '200'
  alias: Morning lights
  triggers:
    - platform: time
      at: '07:00:00'
  actions: []
";
        let (_dir, repo) = repo_with(&[
            ("packages/porch.yaml", package),
            ("automations.yaml", top_level),
        ]);
        let autos = repo.extract_automations();
        assert_eq!(autos.len(), 2);

        let porch = autos.iter().find(|a| a.alias == "Porch on at dusk").unwrap();
        assert_eq!(porch.file, "packages/porch.yaml");
        assert_eq!(porch.triggers, vec!["sun sunset"]);

        let morning = autos.iter().find(|a| a.alias == "Morning lights").unwrap();
        assert_eq!(morning.triggers, vec!["time at 07:00:00"]);
    }

    #[test]
    fn extracts_scripts_with_action_targets() {
        let scripts = "\
goodnight:
  alias: Goodnight
  sequence:
    - action: light.turn_off
      target:
        entity_id:
          - light.front_porch
          - light.hallway
    - service: media_player.turn_off
      target:
        entity_id: media_player.living_room
";
        let (_dir, repo) = repo_with(&[("scripts.yaml", scripts)]);
        let scripts = repo.extract_scripts();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].name, "goodnight");
        assert_eq!(
            scripts[0].actions,
            vec![
                "light.turn_off → light.front_porch, light.hallway",
                "media_player.turn_off → media_player.living_room",
            ]
        );
    }

    #[test]
    fn package_summaries_count_sections() {
        let package = "\
automation:
  - alias: One
input_boolean:
  quiet_hours:
    name: Quiet Hours
script:
  evening:
    sequence: []
";
        let (_dir, repo) = repo_with(&[
            ("packages/house.yaml", package),
            ("packages/broken.yaml", "automation: [unclosed\n"),
        ]);
        let summaries = repo.package_summaries().unwrap();
        assert_eq!(summaries.len(), 2);

        let broken = summaries.iter().find(|s| s.name == "broken.yaml").unwrap();
        assert!(broken.parts.is_none());

        let house = summaries.iter().find(|s| s.name == "house.yaml").unwrap();
        let parts = house.parts.as_ref().unwrap();
        assert!(parts.contains(&"1 automation(s)".to_string()));
        assert!(parts.contains(&"1 input_boolean".to_string()));
        assert!(parts.contains(&"1 script(s)".to_string()));
    }

    #[test]
    fn no_packages_dir_means_no_summaries() {
        let (_dir, repo) = repo_with(&[("configuration.yaml", "homeassistant:\n")]);
        assert!(repo.package_summaries().is_none());
    }

    #[test]
    fn area_map_roundtrip() {
        let areas = "\
porch:
  - light.front_porch
  - switch.front_porch
living_room:
  - light.front_room
";
        let (_dir, repo) = repo_with(&[("areas.yaml", areas)]);
        let map = repo.area_map().unwrap().unwrap();
        assert_eq!(map["porch"], vec!["light.front_porch", "switch.front_porch"]);

        let (_dir2, bare) = repo_with(&[]);
        assert!(bare.area_map().unwrap().is_none());
    }

    #[test]
    fn normalize_area_matches_key_format() {
        assert_eq!(normalize_area("Living Room"), "living_room");
        assert_eq!(normalize_area("Maya's Room"), "mayas_room");
    }
}
