//! Book categories and the static browse list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category a book is filed under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Travel,
    Urdu,
    Children,
    Quran,
    Fiction,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::NonFiction,
        Category::Travel,
        Category::Urdu,
        Category::Children,
        Category::Quran,
        Category::Fiction,
    ];

    /// Stored value
    pub fn as_str(self) -> &'static str {
        match self {
            Category::NonFiction => "Non-Fiction",
            Category::Travel => "Travel",
            Category::Urdu => "Urdu",
            Category::Children => "Children",
            Category::Quran => "Quran",
            Category::Fiction => "Fiction",
        }
    }

    /// Title shown in the browse list
    pub fn title(self) -> &'static str {
        match self {
            Category::NonFiction => "Non-Fiction",
            Category::Travel => "Travel & Exploration",
            Category::Urdu => "Urdu Novel",
            Category::Children => "Children's Books",
            Category::Quran => "Quran Stories",
            Category::Fiction => "Fiction",
        }
    }

    /// Image used for the category tile and for books without a cover
    pub fn image_path(self) -> &'static str {
        match self {
            Category::NonFiction => "/images/nonfiction.png",
            Category::Travel => "/images/travel.png",
            Category::Urdu => "/images/urdu.png",
            Category::Children => "/images/children.png",
            Category::Quran => "/images/quran.png",
            Category::Fiction => "/images/fiction.png",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the stored value or the browse title, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle) || c.title().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown category: {}", needle))
    }
}

/// Entry of the constant category list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryInfo {
    pub id: u32,
    pub title: String,
    pub image: String,
}

/// The category list served to clients
pub fn categories() -> Vec<CategoryInfo> {
    Category::ALL
        .into_iter()
        .enumerate()
        .map(|(i, c)| CategoryInfo {
            id: i as u32 + 1,
            title: c.title().to_string(),
            image: c.image_path().to_string(),
        })
        .collect()
}
