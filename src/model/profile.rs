use serde::{Deserialize, Serialize};

/// One binding-site position as fractions of A, C, G, T.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileColumn {
    pub a: f64,
    pub c: f64,
    pub g: f64,
    pub t: f64,
}

impl ProfileColumn {
    pub fn new(a: f64, c: f64, g: f64, t: f64) -> Self {
        Self { a, c, g, t }
    }

    /// Normalises raw counts (or percentages) to fractions. `None` for an empty column.
    pub fn from_counts(values: [f64; 4]) -> Option<Self> {
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return None;
        }
        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            return None;
        }
        Some(Self::new(
            values[0] / total,
            values[1] / total,
            values[2] / total,
            values[3] / total,
        ))
    }

    pub fn values(&self) -> [f64; 4] {
        [self.a, self.c, self.g, self.t]
    }

    pub fn dot(&self, other: &ProfileColumn) -> f64 {
        self.a * other.a + self.c * other.c + self.g * other.g + self.t * other.t
    }

    pub fn complement(&self) -> Self {
        Self::new(self.t, self.g, self.c, self.a)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.a * factor,
            self.c * factor,
            self.g * factor,
            self.t * factor,
        )
    }
}

/// Position-ordered columns. Order is never permuted except by an explicit reverse complement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    columns: Vec<ProfileColumn>,
}

impl Profile {
    pub fn new(columns: Vec<ProfileColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ProfileColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn reverse_complement(&self) -> Self {
        Self::new(self.columns.iter().rev().map(|c| c.complement()).collect())
    }

    /// Fractions to the 0-100 scale, still fractional.
    pub fn to_percent_scale(&self) -> Vec<[f64; 4]> {
        self.columns
            .iter()
            .map(|c| c.scaled(100.0).values())
            .collect()
    }
}

impl AsRef<Profile> for Profile {
    fn as_ref(&self) -> &Profile {
        self
    }
}

/// Integer percentages in A, C, G, T order; sums to 100 once integerized.
pub type PercentColumn = [u32; 4];

#[cfg(test)]
#[path = "../../tests/src_inline/model/profile.rs"]
mod tests;
