//! Ordered material catalog per mode.
//!
//! The order of materials across groups is the ledger column order and must
//! never be permuted. Group colors are kept apart in [`PresentationHints`];
//! row composition only ever sees [`Taxonomy`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::mode::Mode;
use crate::naming::path_component;

/// A labelled, ordered run of materials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialGroup {
    pub label: String,
    pub materials: Vec<String>,
}

/// Display hint for one group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupHint {
    pub label: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ModeCatalog {
    sources: Vec<String>,
    groups: Vec<MaterialGroup>,
}

/// Immutable catalog of groups, materials and flux/client values per mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Taxonomy {
    incoming: ModeCatalog,
    outgoing: ModeCatalog,
}

/// Group colors per mode, for rendering layers only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresentationHints {
    incoming: Vec<GroupHint>,
    outgoing: Vec<GroupHint>,
}

impl PresentationHints {
    pub fn groups(&self, mode: Mode) -> &[GroupHint] {
        match mode {
            Mode::Incoming => &self.incoming,
            Mode::Outgoing => &self.outgoing,
        }
    }

    pub fn color(&self, mode: Mode, label: &str) -> Option<&str> {
        self.groups(mode)
            .iter()
            .find(|h| h.label == label)
            .map(|h| h.color.as_str())
    }

    pub fn builtin() -> Self {
        Self {
            incoming: builtin_hints(INCOMING_GROUPS),
            outgoing: builtin_hints(OUTGOING_GROUPS),
        }
    }
}

const BLUE: &str = "#0070c0";
const LIGHT_BLUE: &str = "#00b0f0";
const GREEN: &str = "#00b050";
const YELLOW: &str = "#ffc000";
const ORANGE: &str = "#ed7d31";
const RED: &str = "#c00000";

type GroupSpec = (&'static str, &'static str, &'static [&'static str]);

const INCOMING_GROUPS: &[GroupSpec] = &[
    ("FIBREUX", BLUE, &["CARTON", "CARTONNETTE"]),
    ("FIBREUX 2", LIGHT_BLUE, &["ECRIT COULEUR", "JRM", "GM"]),
    ("ELA", GREEN, &["ELA"]),
    ("PLASTIQUES", YELLOW, &["PEPP", "PET Q9", "PET Q5", "PET B", "FILM"]),
    ("METAUX", ORANGE, &["ACIER", "ALU", "PETIT ALU"]),
    (
        "REFUS / AUTRES",
        RED,
        &[
            "PB REFUSES",
            "FILM REFUSES",
            "EMBALLAGES NOIRS",
            "AUTRES EMBALLAGES NON RECYCLABLES",
            "BOIS",
            "VERRE",
            "DDS",
            "D3E",
            "IMBRIQUES",
            "PLASTIQUES NON EMBALLAGES",
            "FERRAILLES",
            "GRAVATS",
            "TEXTILE",
            "EMBALLAGES NON VIDES / SOUILLÉS",
            "REFUS",
            "PAPIER MOUILLE",
            "FINES",
        ],
    ),
];

const OUTGOING_GROUPS: &[GroupSpec] = &[
    ("FIBREUX", BLUE, &["JRM", "EMR", "CARTON", "GM"]),
    ("PLASTIQUES", YELLOW, &["PETQ9", "FLUX DEV", "PET B", "PEPP", "ELA", "FILM"]),
    ("METAUX", ORANGE, &["ACIER", "ALU", "PETIT ALU"]),
    ("AUTRES", RED, &["REFUS"]),
];

const INCOMING_SOURCES: &[&str] = &[
    "GARE MONTPARNASSE",
    "LE PETIT PLUS",
    "LA COURNEUVE",
    "PSM",
    "PSM - ADP BEAUVAIS",
    "LBM",
    "AEROVILLE",
    "CDG",
    "HAUSSMAN",
    "ORLY",
    "CEMEX",
    "LE BOURGET & LBM",
    "ROISSY",
    "DISNEYLAND",
    "VALLEE VILLAGE & 4 TEMPS",
    "GARE DE LYON",
    "SNCF",
    "VALODEA",
    "VALOR'AISME",
    "SITRU",
    "SYCTOM",
    "AUTRES",
];

const OUTGOING_SOURCES: &[&str] = &[
    "JRM", "EMR", "CARTON", "GM", "PETQ9", "FLUX DEV", "PETB", "PEPP", "ELA", "FILM", "ACIER",
    "ALU", "PETIT ALU", "REFUS",
];

fn builtin_catalog(groups: &[GroupSpec], sources: &[&str]) -> ModeCatalog {
    ModeCatalog {
        sources: sources.iter().map(|s| s.to_string()).collect(),
        groups: groups
            .iter()
            .map(|(label, _, materials)| MaterialGroup {
                label: label.to_string(),
                materials: materials.iter().map(|m| m.to_string()).collect(),
            })
            .collect(),
    }
}

fn builtin_hints(groups: &[GroupSpec]) -> Vec<GroupHint> {
    groups
        .iter()
        .map(|(label, color, _)| GroupHint {
            label: label.to_string(),
            color: color.to_string(),
        })
        .collect()
}

// On-disk taxonomy file layout.

#[derive(Deserialize)]
struct TaxonomyFile {
    incoming: ModeFile,
    outgoing: ModeFile,
}

#[derive(Deserialize)]
struct ModeFile {
    sources: Vec<String>,
    groups: Vec<GroupFile>,
}

#[derive(Deserialize)]
struct GroupFile {
    label: String,
    #[serde(default)]
    color: Option<String>,
    materials: Vec<String>,
}

impl ModeFile {
    fn split(self) -> (ModeCatalog, Vec<GroupHint>) {
        let mut hints = Vec::new();
        let mut groups = Vec::with_capacity(self.groups.len());
        for group in self.groups {
            if let Some(color) = group.color {
                hints.push(GroupHint {
                    label: group.label.clone(),
                    color,
                });
            }
            groups.push(MaterialGroup {
                label: group.label,
                materials: group.materials,
            });
        }
        (
            ModeCatalog {
                sources: self.sources,
                groups,
            },
            hints,
        )
    }
}

impl Taxonomy {
    /// The deployment catalog compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            incoming: builtin_catalog(INCOMING_GROUPS, INCOMING_SOURCES),
            outgoing: builtin_catalog(OUTGOING_GROUPS, OUTGOING_SOURCES),
        }
    }

    /// Parse a deployment taxonomy from TOML, splitting out the colors.
    pub fn from_toml_str(input: &str) -> Result<(Self, PresentationHints), ValidationError> {
        let file: TaxonomyFile =
            toml::from_str(input).map_err(|e| ValidationError::Taxonomy(e.to_string()))?;
        let (incoming, incoming_hints) = file.incoming.split();
        let (outgoing, outgoing_hints) = file.outgoing.split();

        let taxonomy = Self { incoming, outgoing };
        taxonomy.validate()?;
        Ok((
            taxonomy,
            PresentationHints {
                incoming: incoming_hints,
                outgoing: outgoing_hints,
            },
        ))
    }

    fn catalog(&self, mode: Mode) -> &ModeCatalog {
        match mode {
            Mode::Incoming => &self.incoming,
            Mode::Outgoing => &self.outgoing,
        }
    }

    pub fn groups(&self, mode: Mode) -> &[MaterialGroup] {
        &self.catalog(mode).groups
    }

    /// Every material of the mode, in ledger column order.
    pub fn ordered_materials(&self, mode: Mode) -> Vec<&str> {
        self.groups(mode)
            .iter()
            .flat_map(|g| g.materials.iter().map(String::as_str))
            .collect()
    }

    pub fn material_count(&self, mode: Mode) -> usize {
        self.groups(mode).iter().map(|g| g.materials.len()).sum()
    }

    pub fn contains(&self, mode: Mode, material: &str) -> bool {
        self.groups(mode)
            .iter()
            .any(|g| g.materials.iter().any(|m| m == material))
    }

    /// Flux (outgoing) or client (incoming) values selectable for the mode.
    pub fn sources(&self, mode: Mode) -> &[String] {
        &self.catalog(mode).sources
    }

    pub fn has_source(&self, mode: Mode, value: &str) -> bool {
        self.sources(mode).iter().any(|s| s == value)
    }

    /// Structural checks applied to any externally supplied taxonomy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for mode in Mode::ALL {
            let catalog = self.catalog(mode);
            if catalog.groups.is_empty() {
                return Err(ValidationError::Taxonomy(format!("{mode} has no groups")));
            }

            let mut seen = HashSet::new();
            let mut file_names = HashMap::new();
            for group in &catalog.groups {
                if group.label.trim().is_empty() {
                    return Err(ValidationError::Taxonomy(format!(
                        "{mode} has a group without label"
                    )));
                }
                if group.materials.is_empty() {
                    return Err(ValidationError::Taxonomy(format!(
                        "{mode} group {:?} has no materials",
                        group.label
                    )));
                }
                for material in &group.materials {
                    if material.trim().is_empty() {
                        return Err(ValidationError::Taxonomy(format!(
                            "{mode} group {:?} has an empty material name",
                            group.label
                        )));
                    }
                    if !seen.insert(material.as_str()) {
                        return Err(ValidationError::Taxonomy(format!(
                            "{mode} material {material:?} appears twice"
                        )));
                    }
                    // Photos are stored as `<file name>.<ext>`.
                    check_file_name(mode, "material", material, &mut file_names)?;
                }
            }

            if catalog.sources.is_empty() {
                return Err(ValidationError::Taxonomy(format!("{mode} has no flux/client list")));
            }
            let mut sources = HashSet::new();
            let mut folder_names = HashMap::new();
            for source in &catalog.sources {
                if source.trim().is_empty() || !sources.insert(source.as_str()) {
                    return Err(ValidationError::Taxonomy(format!(
                        "{mode} flux/client {source:?} is empty or duplicated"
                    )));
                }
                check_file_name(mode, "flux/client", source, &mut folder_names)?;
            }
        }
        Ok(())
    }
}

/// Reject a name with no usable file name, or one whose file name is already
/// taken by another name of the same mode.
fn check_file_name<'a>(
    mode: Mode,
    kind: &str,
    name: &'a str,
    taken: &mut HashMap<String, &'a str>,
) -> Result<(), ValidationError> {
    let Some(file_name) = path_component(name) else {
        return Err(ValidationError::Taxonomy(format!(
            "{mode} {kind} {name:?} has no usable file name"
        )));
    };
    if let Some(other) = taken.insert(file_name.clone(), name) {
        return Err(ValidationError::Taxonomy(format!(
            "{mode} {kind}s {other:?} and {name:?} share the file name {file_name:?}"
        )));
    }
    Ok(())
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_counts_and_order() {
        let taxonomy = Taxonomy::builtin();
        assert!(taxonomy.validate().is_ok());
        assert_eq!(taxonomy.material_count(Mode::Incoming), 31);
        assert_eq!(taxonomy.material_count(Mode::Outgoing), 14);

        let incoming = taxonomy.ordered_materials(Mode::Incoming);
        assert_eq!(&incoming[..3], &["CARTON", "CARTONNETTE", "ECRIT COULEUR"]);
        assert_eq!(incoming.last(), Some(&"FINES"));

        let outgoing = taxonomy.ordered_materials(Mode::Outgoing);
        assert_eq!(outgoing.first(), Some(&"JRM"));
        assert_eq!(outgoing.last(), Some(&"REFUS"));
    }

    #[test]
    fn ordering_is_stable_across_calls() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(
            taxonomy.ordered_materials(Mode::Incoming),
            taxonomy.ordered_materials(Mode::Incoming)
        );
    }

    #[test]
    fn sources_per_mode() {
        let taxonomy = Taxonomy::builtin();
        assert!(taxonomy.has_source(Mode::Incoming, "SNCF"));
        assert!(!taxonomy.has_source(Mode::Outgoing, "SNCF"));
        assert_eq!(taxonomy.sources(Mode::Outgoing).len(), 14);
    }

    #[test]
    fn builtin_hints_match_groups() {
        let taxonomy = Taxonomy::builtin();
        let hints = PresentationHints::builtin();
        for mode in Mode::ALL {
            assert_eq!(hints.groups(mode).len(), taxonomy.groups(mode).len());
        }
        assert_eq!(hints.color(Mode::Outgoing, "METAUX"), Some("#ed7d31"));
    }

    const SMALL: &str = r##"
        [incoming]
        sources = ["SNCF"]

        [[incoming.groups]]
        label = "FIBREUX"
        color = "#0070c0"
        materials = ["CARTON", "GM"]

        [outgoing]
        sources = ["JRM"]

        [[outgoing.groups]]
        label = "AUTRES"
        materials = ["REFUS"]
    "##;

    #[test]
    fn loads_toml_and_splits_colors() {
        let (taxonomy, hints) = Taxonomy::from_toml_str(SMALL).unwrap();
        assert_eq!(taxonomy.ordered_materials(Mode::Incoming), vec!["CARTON", "GM"]);
        assert_eq!(taxonomy.ordered_materials(Mode::Outgoing), vec!["REFUS"]);
        assert_eq!(hints.color(Mode::Incoming, "FIBREUX"), Some("#0070c0"));
        assert!(hints.groups(Mode::Outgoing).is_empty());
    }

    #[test]
    fn rejects_duplicate_material() {
        let input = SMALL.replace(r#"["CARTON", "GM"]"#, r#"["CARTON", "CARTON"]"#);
        let err = Taxonomy::from_toml_str(&input).unwrap_err();
        assert!(matches!(err, ValidationError::Taxonomy(msg) if msg.contains("twice")));
    }

    #[test]
    fn rejects_materials_sharing_a_file_name() {
        let input = SMALL.replace(r#"["CARTON", "GM"]"#, r#"["PET Q9", "PET_Q9"]"#);
        let err = Taxonomy::from_toml_str(&input).unwrap_err();
        assert!(
            matches!(err, ValidationError::Taxonomy(msg) if msg.contains("share the file name"))
        );

        let input = SMALL.replace(r#"["CARTON", "GM"]"#, r#"["A/B", "A-B"]"#);
        assert!(Taxonomy::from_toml_str(&input).is_err());
    }

    #[test]
    fn rejects_material_without_file_name() {
        let input = SMALL.replace(r#"["CARTON", "GM"]"#, r#"["CARTON", ".."]"#);
        let err = Taxonomy::from_toml_str(&input).unwrap_err();
        assert!(
            matches!(err, ValidationError::Taxonomy(msg) if msg.contains("no usable file name"))
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            Taxonomy::from_toml_str("incoming = 3"),
            Err(ValidationError::Taxonomy(_))
        ));
    }
}
