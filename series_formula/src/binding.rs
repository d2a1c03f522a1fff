//! Positional binding of formula letters to series

use crate::error::FormulaError;
use serde::Serialize;
use series_data::SeriesId;
use std::collections::BTreeMap;

/// Number of bindable letters
pub const MAX_VARIABLES: usize = 26;

/// Letter bound to the `index`-th active series
pub fn letter_for(index: usize) -> Option<char> {
    (index < MAX_VARIABLES).then(|| (b'A' + index as u8) as char)
}

/// Position of a letter in the binding order
pub fn index_of(letter: char) -> Option<usize> {
    letter
        .is_ascii_uppercase()
        .then(|| (letter as u8 - b'A') as usize)
}

/// Human readable range of valid variables for `count` active series
pub fn valid_range(count: usize) -> String {
    match count.min(MAX_VARIABLES) {
        0 => "none (no series are active)".to_string(),
        1 => "\"A\"".to_string(),
        n => match letter_for(n - 1) {
            Some(last) => format!("\"A\" through \"{}\"", last),
            None => "\"A\"".to_string(),
        },
    }
}

/// Immutable `letter -> series` map captured when a formula is created.
///
/// The binding is never re-resolved: removing or reordering series afterwards
/// does not change what a letter refers to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VariableBinding {
    letters: BTreeMap<char, SeriesId>,
}

impl VariableBinding {
    /// Bind series to `A`, `B`, ... in the given order.
    ///
    /// Series beyond the 26th cannot be referenced and are left unbound.
    pub fn positional<I>(ids: I) -> Result<Self, FormulaError>
    where
        I: IntoIterator<Item = SeriesId>,
    {
        let letters: BTreeMap<char, SeriesId> = ids
            .into_iter()
            .enumerate()
            .filter_map(|(index, id)| letter_for(index).map(|letter| (letter, id)))
            .collect();

        if letters.is_empty() {
            return Err(FormulaError::EmptyBinding);
        }
        Ok(Self { letters })
    }

    /// Series bound to `letter`
    pub fn get(&self, letter: char) -> Option<&SeriesId> {
        self.letters.get(&letter)
    }

    /// Bound letters in order
    pub fn iter(&self) -> impl Iterator<Item = (char, &SeriesId)> {
        self.letters.iter().map(|(letter, id)| (*letter, id))
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert_eq!(letter_for(0), Some('A'));
        assert_eq!(letter_for(25), Some('Z'));
        assert_eq!(letter_for(26), None);
        assert_eq!(index_of('C'), Some(2));
        assert_eq!(index_of('c'), None);
    }

    #[test]
    fn test_valid_range() {
        assert_eq!(valid_range(0), "none (no series are active)");
        assert_eq!(valid_range(1), "\"A\"");
        assert_eq!(valid_range(2), "\"A\" through \"B\"");
        assert_eq!(valid_range(40), "\"A\" through \"Z\"");
    }

    #[test]
    fn test_positional_binding() {
        let binding =
            VariableBinding::positional(vec![SeriesId::from("gdp"), SeriesId::from("cpi")]).unwrap();
        assert_eq!(binding.len(), 2);
        assert_eq!(binding.get('B'), Some(&SeriesId::from("cpi")));
        assert_eq!(binding.get('C'), None);
    }

    #[test]
    fn test_empty_binding() {
        assert_eq!(
            VariableBinding::positional(Vec::new()),
            Err(FormulaError::EmptyBinding)
        );
    }
}
