mod book;
mod extended;
mod series;

pub use self::book::Book;
pub use self::extended::Extended;
pub use self::series::SeriesPosition;
