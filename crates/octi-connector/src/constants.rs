//! Lookup tables between human-facing names and the platform taxonomy.
//!
//! Every lookup is case-insensitive and ignores surrounding whitespace.
//! Unknown names resolve to `None`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Observable kinds an operator can name when creating or filtering indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndicatorKind {
    Account,
    Domain,
    Email,
    FileMd5,
    FileSha1,
    FileSha256,
    Host,
    Ipv4,
    Ipv6,
    #[serde(rename = "registry key")]
    RegistryKey,
    Url,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 11] = [
        IndicatorKind::Account,
        IndicatorKind::Domain,
        IndicatorKind::Email,
        IndicatorKind::FileMd5,
        IndicatorKind::FileSha1,
        IndicatorKind::FileSha256,
        IndicatorKind::Host,
        IndicatorKind::Ipv4,
        IndicatorKind::Ipv6,
        IndicatorKind::RegistryKey,
        IndicatorKind::Url,
    ];

    /// Resolves a human-facing name such as `"IPv4"` or `"File-SHA256"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Lowercase human-facing name.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::Account => "account",
            IndicatorKind::Domain => "domain",
            IndicatorKind::Email => "email",
            IndicatorKind::FileMd5 => "file-md5",
            IndicatorKind::FileSha1 => "file-sha1",
            IndicatorKind::FileSha256 => "file-sha256",
            IndicatorKind::Host => "host",
            IndicatorKind::Ipv4 => "ipv4",
            IndicatorKind::Ipv6 => "ipv6",
            IndicatorKind::RegistryKey => "registry key",
            IndicatorKind::Url => "url",
        }
    }

    /// STIX cyber observable type used as the platform `entity_type`.
    pub fn stix_type(&self) -> &'static str {
        match self {
            IndicatorKind::Account => "User-Account",
            IndicatorKind::Domain => "Domain-Name",
            IndicatorKind::Email => "Email-Addr",
            IndicatorKind::FileMd5 | IndicatorKind::FileSha1 | IndicatorKind::FileSha256 => {
                "StixFile"
            }
            IndicatorKind::Host => "X-OpenCTI-Hostname",
            IndicatorKind::Ipv4 => "IPv4-Addr",
            IndicatorKind::Ipv6 => "IPv6-Addr",
            IndicatorKind::RegistryKey => "Windows-Registry-Key",
            IndicatorKind::Url => "Url",
        }
    }

    /// `type` sent to `stixCyberObservableAdd`.
    ///
    /// Matches [`stix_type`](Self::stix_type) except for hosts, which the
    /// platform creates as `Hostname`.
    pub fn add_type(&self) -> &'static str {
        match self {
            IndicatorKind::Host => "Hostname",
            other => other.stix_type(),
        }
    }

    /// Name of the typed input argument on `stixCyberObservableAdd`.
    pub fn input_argument(&self) -> &'static str {
        match self {
            IndicatorKind::Account => "UserAccount",
            IndicatorKind::Domain => "DomainName",
            IndicatorKind::Email => "EmailAddr",
            IndicatorKind::FileMd5 | IndicatorKind::FileSha1 | IndicatorKind::FileSha256 => {
                "StixFile"
            }
            IndicatorKind::Host => "Hostname",
            IndicatorKind::Ipv4 => "IPv4Addr",
            IndicatorKind::Ipv6 => "IPv6Addr",
            IndicatorKind::RegistryKey => "WindowsRegistryKey",
            IndicatorKind::Url => "Url",
        }
    }

    /// GraphQL input type of [`input_argument`](Self::input_argument).
    pub fn input_type(&self) -> String {
        format!("{}AddInput", self.input_argument())
    }

    /// STIX pattern path of the hash for file kinds.
    pub fn hash_path(&self) -> Option<&'static str> {
        match self {
            IndicatorKind::FileMd5 => Some("file.hashes.md5"),
            IndicatorKind::FileSha1 => Some("file.hashes.sha-1"),
            IndicatorKind::FileSha256 => Some("file.hashes.sha-256"),
            _ => None,
        }
    }

    /// Hash algorithm label the platform stores for file kinds.
    pub fn hash_algorithm(&self) -> Option<&'static str> {
        match self {
            IndicatorKind::FileMd5 => Some("MD5"),
            IndicatorKind::FileSha1 => Some("SHA-1"),
            IndicatorKind::FileSha256 => Some("SHA-256"),
            _ => None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.hash_path().is_some()
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown indicator type: {}", s))
    }
}

/// Maps an indicator type name to its STIX observable type.
pub fn stix_type_for(name: &str) -> Option<&'static str> {
    IndicatorKind::from_name(name).map(|kind| kind.stix_type())
}

/// Maps a file indicator type name to its hash field path.
pub fn hash_path_for(name: &str) -> Option<&'static str> {
    IndicatorKind::from_name(name).and_then(|kind| kind.hash_path())
}

/// Observable attributes that can be updated through their alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateField {
    Description,
    Score,
}

impl UpdateField {
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias.trim().to_lowercase().as_str() {
            "description" => Some(UpdateField::Description),
            "score" => Some(UpdateField::Score),
            _ => None,
        }
    }

    /// Platform attribute key the alias stands for.
    pub fn attribute_key(&self) -> &'static str {
        match self {
            UpdateField::Description => "x_opencti_description",
            UpdateField::Score => "x_opencti_score",
        }
    }
}

/// Source reliability ratings (Admiralty scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reliability {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Reliability {
    pub const ALL: [Reliability; 6] = [
        Reliability::A,
        Reliability::B,
        Reliability::C,
        Reliability::D,
        Reliability::E,
        Reliability::F,
    ];

    /// Accepts the letter, the phrase, or the full platform label.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|r| {
            name == r.letter() || name == r.phrase() || name == r.label().to_lowercase()
        })
    }

    fn letter(&self) -> &'static str {
        match self {
            Reliability::A => "a",
            Reliability::B => "b",
            Reliability::C => "c",
            Reliability::D => "d",
            Reliability::E => "e",
            Reliability::F => "f",
        }
    }

    fn phrase(&self) -> &'static str {
        match self {
            Reliability::A => "completely reliable",
            Reliability::B => "usually reliable",
            Reliability::C => "fairly reliable",
            Reliability::D => "not usually reliable",
            Reliability::E => "unreliable",
            Reliability::F => "reliability cannot be judged",
        }
    }

    /// Value stored in `x_opencti_reliability`.
    pub fn label(&self) -> &'static str {
        match self {
            Reliability::A => "A - Completely reliable",
            Reliability::B => "B - Usually reliable",
            Reliability::C => "C - Fairly reliable",
            Reliability::D => "D - Not usually reliable",
            Reliability::E => "E - Unreliable",
            Reliability::F => "F - Reliability cannot be judged",
        }
    }
}

/// Fields that can be attached to or detached from an observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationField {
    MarkingDefinition,
    Label,
}

impl RelationField {
    /// Matches the host's exact field names, `"Marking Definition"` and `"Label"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Marking Definition" => Some(RelationField::MarkingDefinition),
            "Label" => Some(RelationField::Label),
            _ => None,
        }
    }

    pub fn relationship_type(&self) -> &'static str {
        match self {
            RelationField::MarkingDefinition => "object-marking",
            RelationField::Label => "object-label",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_table() {
        let expected = [
            ("account", "User-Account"),
            ("domain", "Domain-Name"),
            ("email", "Email-Addr"),
            ("file-md5", "StixFile"),
            ("file-sha1", "StixFile"),
            ("file-sha256", "StixFile"),
            ("host", "X-OpenCTI-Hostname"),
            ("ipv4", "IPv4-Addr"),
            ("ipv6", "IPv6-Addr"),
            ("registry key", "Windows-Registry-Key"),
            ("url", "Url"),
        ];
        for (name, stix) in expected {
            assert_eq!(stix_type_for(name), Some(stix), "{}", name);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(
            IndicatorKind::from_name("Registry Key"),
            Some(IndicatorKind::RegistryKey)
        );
        assert_eq!(
            IndicatorKind::from_name(" IPv4 "),
            Some(IndicatorKind::Ipv4)
        );
        assert_eq!(
            "File-SHA256".parse::<IndicatorKind>(),
            Ok(IndicatorKind::FileSha256)
        );
        assert!(IndicatorKind::from_name("mutex").is_none());
    }

    #[test]
    fn test_hash_paths() {
        assert_eq!(hash_path_for("file-md5"), Some("file.hashes.md5"));
        assert_eq!(hash_path_for("File-SHA1"), Some("file.hashes.sha-1"));
        assert_eq!(hash_path_for("file-sha256"), Some("file.hashes.sha-256"));
        assert_eq!(hash_path_for("domain"), None);
        assert_eq!(IndicatorKind::FileSha1.hash_algorithm(), Some("SHA-1"));
    }

    #[test]
    fn test_input_type() {
        assert_eq!(IndicatorKind::Ipv4.input_type(), "IPv4AddrAddInput");
        assert_eq!(IndicatorKind::FileMd5.input_argument(), "StixFile");
        assert_eq!(IndicatorKind::Host.input_type(), "HostnameAddInput");
    }

    #[test]
    fn test_add_type() {
        assert_eq!(IndicatorKind::Host.stix_type(), "X-OpenCTI-Hostname");
        assert_eq!(IndicatorKind::Host.add_type(), "Hostname");
        assert_eq!(IndicatorKind::Ipv6.add_type(), "IPv6-Addr");
        assert_eq!(IndicatorKind::FileSha256.add_type(), "StixFile");
    }

    #[test]
    fn test_update_fields() {
        assert_eq!(
            UpdateField::from_alias("Score").map(|f| f.attribute_key()),
            Some("x_opencti_score")
        );
        assert_eq!(
            UpdateField::from_alias("description").map(|f| f.attribute_key()),
            Some("x_opencti_description")
        );
        assert!(UpdateField::from_alias("name").is_none());
    }

    #[test]
    fn test_reliability() {
        assert_eq!(Reliability::from_name("a"), Some(Reliability::A));
        assert_eq!(
            Reliability::from_name("Usually Reliable"),
            Some(Reliability::B)
        );
        assert_eq!(
            Reliability::from_name("F - Reliability cannot be judged"),
            Some(Reliability::F)
        );
        assert_eq!(Reliability::E.label(), "E - Unreliable");
        assert!(Reliability::from_name("sometimes").is_none());
    }

    #[test]
    fn test_relation_field_names_are_exact() {
        assert_eq!(
            RelationField::from_name("Marking Definition"),
            Some(RelationField::MarkingDefinition)
        );
        assert_eq!(RelationField::from_name("label"), None);
        assert_eq!(RelationField::Label.relationship_type(), "object-label");
    }
}
