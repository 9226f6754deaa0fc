// src/domain/page.rs
//
// Pagination value types used by title search.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{DomainError, DomainResult};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Title,
    Year,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortField::Title => write!(f, "title"),
            SortField::Year => write!(f, "year"),
            SortField::Score => write!(f, "score"),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Parses `field` or `field,direction`, e.g. `score,desc`.
impl FromStr for Sort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);

        let field = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("title") | Some("") | None => SortField::Title,
            Some("year") => SortField::Year,
            Some("score") => SortField::Score,
            Some(other) => {
                return Err(DomainError::InvariantViolation(format!(
                    "Unknown sort field '{}'",
                    other
                )))
            }
        };

        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("asc") | None => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(DomainError::InvariantViolation(format!(
                    "Unknown sort direction '{}'",
                    other
                )))
            }
        };

        if parts.next().is_some() {
            return Err(DomainError::InvariantViolation(format!(
                "Malformed sort specification '{}'",
                s
            )));
        }

        Ok(Sort { field, direction })
    }
}

/// A zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Sort) -> DomainResult<Self> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(DomainError::InvariantViolation(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, size, sort })
    }

    pub fn of(page: u32, size: u32) -> DomainResult<Self> {
        Self::new(page, size, Sort::default())
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

/// One page of results plus totals over the whole result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = total_elements.div_ceil(size) as u32;
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let req = PageRequest::of(0, 10).unwrap();
        assert_eq!(Page::new(vec![1], &req, 1).total_pages, 1);
        assert_eq!(Page::new(Vec::<i32>::new(), &req, 0).total_pages, 0);
        assert_eq!(Page::new(vec![1; 10], &req, 21).total_pages, 3);
    }

    #[test]
    fn test_page_size_is_bounded() {
        assert!(PageRequest::of(0, 0).is_err());
        assert!(PageRequest::of(0, MAX_PAGE_SIZE + 1).is_err());
        assert_eq!(PageRequest::of(3, 20).unwrap().offset(), 60);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("score,desc".parse::<Sort>().unwrap(), Sort::new(SortField::Score, SortDirection::Desc));
        assert_eq!("Year".parse::<Sort>().unwrap(), Sort::new(SortField::Year, SortDirection::Asc));
        assert!("rating".parse::<Sort>().is_err());
        assert!("title,up".parse::<Sort>().is_err());
    }
}
