//! Secondary, in-memory ordering of a page of pets.
//!
//! The upstream only filters by status, so sorting by id, name or status
//! label happens here, after mapping.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use crate::mapper::PetView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Status,
}

impl SortKey {
    /// Anything outside `id`, `name`, `status` becomes `Id`.
    pub fn parse(input: Option<&str>) -> Self {
        match input {
            Some("name") => SortKey::Name,
            Some("status") => SortKey::Status,
            _ => SortKey::Id,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only an exact `desc` selects descending order.
    pub fn parse(input: Option<&str>) -> Self {
        match input {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Stable sort; `Desc` inverts each comparison instead of reversing the
/// result, so equal elements keep their upstream order in both directions.
pub fn sort_pets(pets: &mut [PetView], key: SortKey, direction: SortDirection) {
    pets.sort_by(|a, b| {
        let ord = match key {
            SortKey::Id => a.id.unwrap_or(0).cmp(&b.id.unwrap_or(0)),
            SortKey::Name => natural_cmp_ignore_case(&a.name, &b.name),
            SortKey::Status => natural_cmp_ignore_case(&a.status_label, &b.status_label),
        };
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Case-insensitive natural ordering: digit runs compare by numeric value,
/// so `pet2` sorts before `pet10`.
pub fn natural_cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        let ord = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right))
            }
            (Some(x), Some(y)) => {
                left.next();
                right.next();
                x.to_lowercase().cmp(y.to_lowercase())
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(id: i64, name: &str, label: &str) -> PetView {
        PetView {
            id: Some(id),
            name: name.to_string(),
            status: None,
            status_label: label.to_string(),
            category: None,
            tag_names: Vec::new(),
            photo_urls: Vec::new(),
        }
    }

    fn ids(pets: &[PetView]) -> Vec<i64> {
        pets.iter().filter_map(|p| p.id).collect()
    }

    #[test]
    fn unknown_key_and_direction_fall_back() {
        assert_eq!(SortKey::parse(Some("category")), SortKey::Id);
        assert_eq!(SortKey::parse(Some("NAME")), SortKey::Id);
        assert_eq!(SortKey::parse(None), SortKey::Id);
        assert_eq!(SortKey::parse(Some("status")), SortKey::Status);
        assert_eq!(SortDirection::parse(Some("down")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("desc")), SortDirection::Desc);
    }

    #[test]
    fn sort_by_id_both_directions() {
        let mut pets = vec![pet(3, "c", ""), pet(1, "a", ""), pet(2, "b", "")];
        sort_pets(&mut pets, SortKey::Id, SortDirection::Asc);
        assert_eq!(ids(&pets), vec![1, 2, 3]);
        sort_pets(&mut pets, SortKey::Id, SortDirection::Desc);
        assert_eq!(ids(&pets), vec![3, 2, 1]);
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let mut pets = vec![pet(1, "bob", ""), pet(2, "Alice", "")];
        sort_pets(&mut pets, SortKey::Name, SortDirection::Asc);
        let names: Vec<_> = pets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "bob"]);
    }

    #[test]
    fn sort_by_name_is_natural() {
        let mut pets = vec![pet(1, "pet10", ""), pet(2, "Pet2", ""), pet(3, "pet1", "")];
        sort_pets(&mut pets, SortKey::Name, SortDirection::Asc);
        assert_eq!(ids(&pets), vec![3, 2, 1]);
    }

    #[test]
    fn sort_by_status_uses_label() {
        let mut pets = vec![
            pet(1, "a", "Sprzedany"),
            pet(2, "b", "Dostępny"),
            pet(3, "c", "Oczekujący"),
        ];
        sort_pets(&mut pets, SortKey::Status, SortDirection::Asc);
        assert_eq!(ids(&pets), vec![2, 3, 1]);
    }

    #[test]
    fn descending_keeps_ties_stable() {
        let mut pets = vec![pet(1, "same", ""), pet(2, "other", ""), pet(3, "Same", "")];
        sort_pets(&mut pets, SortKey::Name, SortDirection::Desc);
        assert_eq!(ids(&pets), vec![1, 3, 2]);
    }

    #[test]
    fn natural_compare_cases() {
        assert_eq!(natural_cmp_ignore_case("a2", "a10"), Ordering::Less);
        assert_eq!(natural_cmp_ignore_case("a010", "a10"), Ordering::Equal);
        assert_eq!(natural_cmp_ignore_case("ABC", "abc"), Ordering::Equal);
        assert_eq!(natural_cmp_ignore_case("ab", "abc"), Ordering::Less);
        assert_eq!(natural_cmp_ignore_case("", ""), Ordering::Equal);
    }
}
