//! Domain entities: regions and their classification

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Hierarchy level of a region, fixed by the world schema.
///
/// `World` is reserved for the document root; persisted region elements
/// carry one of the four geographic levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionType {
    World,
    Continent,
    Nation,
    State,
    County,
}

impl RegionType {
    pub const ALL: [RegionType; 5] = [
        RegionType::World,
        RegionType::Continent,
        RegionType::Nation,
        RegionType::State,
        RegionType::County,
    ];

    /// Attribute value used in the wire format.
    pub fn schema_name(&self) -> &'static str {
        match self {
            RegionType::World => "World",
            RegionType::Continent => "Continent",
            RegionType::Nation => "Nation",
            RegionType::State => "State",
            RegionType::County => "County",
        }
    }

    pub fn from_schema_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.schema_name() == name)
    }

    /// Depth rank in the hierarchy: World=0 down to County=4.
    pub fn rank(&self) -> u8 {
        match self {
            RegionType::World => 0,
            RegionType::Continent => 1,
            RegionType::Nation => 2,
            RegionType::State => 3,
            RegionType::County => 4,
        }
    }

    /// Nesting rule: a child must sit strictly deeper in the hierarchy
    /// than its parent. A County may not contain a Nation, and nothing
    /// may contain a World.
    pub fn may_contain(&self, child: RegionType) -> bool {
        child.rank() > self.rank()
    }
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

/// A node in the geographic hierarchy. Plain data, no behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Globally unique, case-sensitive identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Hierarchy level
    pub kind: RegionType,
    /// Capital city, optional for every level
    pub capital: Option<String>,
}

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: RegionType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            capital: None,
        }
    }

    pub fn with_capital(mut self, capital: impl Into<String>) -> Self {
        self.capital = Some(capital.into());
        self
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

static ID_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Schema-constrained id syntax: a letter followed by letters, digits,
/// `_`, `.` or `-`. The document name (root id) is exempt.
pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*$").unwrap())
        .is_match(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn schema_names_round_trip() {
        for kind in RegionType::ALL {
            assert_eq!(RegionType::from_schema_name(kind.schema_name()), Some(kind));
        }
        assert_eq!(RegionType::from_schema_name("Planet"), None);
    }

    #[rstest]
    #[case(RegionType::World, RegionType::County, true)]
    #[case(RegionType::Continent, RegionType::Nation, true)]
    #[case(RegionType::County, RegionType::Nation, false)]
    #[case(RegionType::Nation, RegionType::Nation, false)]
    #[case(RegionType::State, RegionType::World, false)]
    fn nesting_rule(
        #[case] parent: RegionType,
        #[case] child: RegionType,
        #[case] allowed: bool,
    ) {
        assert_eq!(parent.may_contain(child), allowed);
    }

    #[rstest]
    #[case("AF", true)]
    #[case("north-rhine.westphalia_2", true)]
    #[case("", false)]
    #[case("9lives", false)]
    #[case("two words", false)]
    fn id_syntax(#[case] id: &str, #[case] valid: bool) {
        assert_eq!(is_valid_id(id), valid);
    }
}
