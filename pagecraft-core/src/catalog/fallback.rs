//! Secondary book source used when the store has nothing to offer

use crate::types::{Book, Category};
use chrono::{DateTime, Utc};

/// Books to show when the primary store is empty or unreachable
pub trait FallbackSource: Send + Sync {
    /// Books filed under a category, in any order
    fn books_in(&self, category: Category) -> Vec<Book>;

    /// Every book the source knows
    fn all_books(&self) -> Vec<Book>;
}

/// A fixed list of books
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    books: Vec<Book>,
}

impl StaticCatalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Public-domain and freely hosted titles with remote PDFs
    pub fn seeded() -> Self {
        let seed: &[(&str, &str, &str, Category, &str, &str, u64)] = &[
            (
                "big-fish-and-little-fish",
                "Big Fish and Little Fish",
                "Unknown",
                Category::Children,
                "https://freekidsbooks.org/wp-content/uploads/2025/03/2403-Big-Fish-and-Little-Fish-BB-FKB.pdf",
                "A story about a big fish and a little fish.",
                1000,
            ),
            (
                "hide-and-seek",
                "Hide and Seek",
                "Unknown",
                Category::Children,
                "https://starofthesea.co.za/wp-content/uploads/2021/02/Hide-and-Seek.pdf",
                "A fun hide and seek story.",
                800,
            ),
            (
                "brave-new-world",
                "Brave New World",
                "Aldous Huxley",
                Category::NonFiction,
                "https://www.plato-philosophy.org/wp-content/uploads/2016/05/BraveNewWorld-1.pdf",
                "A dystopian social science fiction novel.",
                12345,
            ),
            (
                "the-time-machine",
                "The Time Machine",
                "H.G. Wells",
                Category::NonFiction,
                "https://www.fourmilab.ch/etexts/www/wells/timemach/timemach.pdf",
                "A science fiction novel by H. G. Wells, published in 1895.",
                9876,
            ),
            (
                "book-of-wisdom",
                "Book Of Wisdom",
                "Unknown",
                Category::NonFiction,
                "https://dn790003.ca.archive.org/0/items/bookofwisdomgree00deanrich/bookofwisdomgree00deanrich.pdf",
                "A book of wisdom.",
                5000,
            ),
            (
                "the-white-darkness",
                "The White Darkness",
                "Unknown",
                Category::NonFiction,
                "https://cdn.bookey.app/files/pdf/book/en/the-white-darkness.pdf",
                "A chilling adventure.",
                3000,
            ),
            (
                "365-stories",
                "365 Stories",
                "Unknown",
                Category::Quran,
                "https://www.islamicbulletin.org/free_downloads/sa/365%20Stories%20Part%202.pdf",
                "Stories from the Quran.",
                2000,
            ),
            (
                "angels-belief",
                "Angels: Belief in them",
                "Sh Al Fawzan",
                Category::Quran,
                "https://www.islamicstudiesresources.com/uploads/1/9/8/1/19819855/belief-in-angels.pdf",
                "A book about angels in Islam.",
                1500,
            ),
            (
                "age-of-exploration",
                "The Age of Exploration",
                "Unknown",
                Category::Travel,
                "https://www.coreknowledge.org/wp-content/uploads/2017/03/CKHG_G5_U3_AgeExploration_SR.pdf",
                "Exploring the world.",
                1200,
            ),
            (
                "travel-alone",
                "Travel Alone and Love It",
                "Unknown",
                Category::Travel,
                "https://solotravelerworld.com/wp-content/uploads/2009/10/Travel-Alone-and-Love-It1.pdf",
                "Traveling solo.",
                900,
            ),
            (
                "pir-e-kamil",
                "Pir e Kamil",
                "Umera Ahmed",
                Category::Urdu,
                "https://bookurdunovel.com/wp-content/uploads/2025/07/peer-e-kamil-novel-by-umera-ahmed-book-urdu-novel-4354.pdf",
                "A famous Urdu novel.",
                4000,
            ),
            (
                "aab-e-hayat",
                "Aab e Hayat",
                "Umera Ahmed",
                Category::Urdu,
                "https://www.urduchannel.in/wp-content/uploads/2018/11/Aab-e-Hayat-Part-2.pdf",
                "Sequel to Pir e Kamil.",
                3500,
            ),
        ];

        // Fixed timestamp so seed books compare equal across processes
        let seeded_at: DateTime<Utc> = DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default();

        let books = seed
            .iter()
            .map(|&(id, title, author, category, pdf, description, views)| {
                let mut book = Book::new(title, author, pdf, category)
                    .with_description(description)
                    .with_pdf_file(pdf)
                    .with_views(views);
                book.id = id.to_string();
                book.created_at = seeded_at;
                book
            })
            .collect();

        Self { books }
    }
}

impl FallbackSource for StaticCatalog {
    fn books_in(&self, category: Category) -> Vec<Book> {
        self.books
            .iter()
            .filter(|b| b.category == category)
            .cloned()
            .collect()
    }

    fn all_books(&self) -> Vec<Book> {
        self.books.clone()
    }
}
