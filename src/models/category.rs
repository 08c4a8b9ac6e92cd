use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed, closed set of practice categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Scales,    // scales
    Review,    // review repertoire
    New,       // new repertoire
    Technique, // technique
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 4] = [
        Category::Scales,
        Category::Review,
        Category::New,
        Category::Technique,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Convert enum → DB / wire string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Category::Scales => "scales",
            Category::Review => "review",
            Category::New => "new",
            Category::Technique => "technique",
        }
    }

    /// Convert DB / wire string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scales" => Some(Category::Scales),
            "review" => Some(Category::Review),
            "new" => Some(Category::New),
            "technique" => Some(Category::Technique),
            _ => None,
        }
    }

    /// Lenient parser for CLI input ("Scales", "new-repertoire", "tech", ...)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "s" | "scales" => Some(Category::Scales),
            "r" | "review" | "review-repertoire" => Some(Category::Review),
            "n" | "new" | "new-repertoire" => Some(Category::New),
            "t" | "tech" | "technique" => Some(Category::Technique),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Scales => "Scales",
            Category::Review => "Review Rep",
            Category::New => "New Rep",
            Category::Technique => "Technique",
        }
    }

    /// Position inside `Category::ALL`, used to index per-category arrays.
    pub fn index(&self) -> usize {
        match self {
            Category::Scales => 0,
            Category::Review => 1,
            Category::New => 2,
            Category::Technique => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// One value per category, indexed by `Category::index`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PerCategory<T>(pub [T; Category::COUNT]);

impl<T: Copy> PerCategory<T> {
    pub fn get(&self, c: Category) -> T {
        self.0[c.index()]
    }

    pub fn set(&mut self, c: Category, v: T) {
        self.0[c.index()] = v;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, T)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}
