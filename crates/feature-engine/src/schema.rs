//! Per-domain feature layout

use crate::Domain;

/// Input key of a field: canonical snake_case name plus the other names
/// clients send it under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    /// Canonical name, also used in error messages and feature names
    pub name: &'static str,
    /// Alternative keys accepted on input, tried in order
    pub aliases: &'static [&'static str],
}

impl FieldKey {
    pub const fn new(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases }
    }

    /// Canonical name followed by every alias
    pub fn accepted(&self) -> impl Iterator<Item = &'static str> {
        let name: &'static str = self.name;
        let aliases: &'static [&'static str] = self.aliases;
        std::iter::once(name).chain(aliases.iter().copied())
    }
}

/// Categorical field with its ordered category set
#[derive(Debug, Clone, Copy)]
pub struct CategoricalField {
    pub key: FieldKey,
    pub categories: &'static [&'static str],
}

impl CategoricalField {
    /// Number of one-hot slots
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// One-hot block for `value`
    pub fn encode<'a>(&'a self, value: &'a str) -> impl Iterator<Item = f64> + 'a {
        one_hot(value, self.categories)
    }
}

/// Gender, shared by both domains
pub const GENDER: CategoricalField = CategoricalField {
    key: FieldKey::new("gender", &["Gender"]),
    categories: &["Male", "Female"],
};

/// One slot per category, set to 1.0 on exact, case-sensitive match.
///
/// A value outside the category set yields an all-zero block.
pub fn one_hot<'a>(value: &'a str, categories: &'a [&'a str]) -> impl Iterator<Item = f64> + 'a {
    categories
        .iter()
        .map(move |category| if *category == value { 1.0 } else { 0.0 })
}

/// Feature layout of one domain: numeric fields first, then the
/// categorical one-hot blocks, each in declaration order
#[derive(Debug)]
pub struct Schema {
    pub domain: Domain,
    pub numeric: &'static [FieldKey],
    pub categorical: &'static [CategoricalField],
}

impl Schema {
    /// Total vector length
    pub fn dimension(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(CategoricalField::width).sum::<usize>()
    }

    /// Column names in vector order, e.g. `gender_Male`
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.numeric.iter().map(|key| key.name.to_string()).collect();
        for field in self.categorical {
            names.extend(
                field
                    .categories
                    .iter()
                    .map(|category| format!("{}_{}", field.key.name, category)),
            );
        }
        names
    }

    /// Position of a named column
    pub fn index_of(&self, feature: &str) -> Option<usize> {
        self.feature_names().iter().position(|name| name == feature)
    }

    /// Every input key the schema requires, numeric fields first
    pub fn required_keys(&self) -> impl Iterator<Item = &'static FieldKey> {
        let numeric: &'static [FieldKey] = self.numeric;
        let categorical: &'static [CategoricalField] = self.categorical;
        numeric
            .iter()
            .chain(categorical.iter().map(|field| &field.key))
    }
}
