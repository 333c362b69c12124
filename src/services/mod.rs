pub mod filer;
pub mod scan;
pub mod searcher;

pub use filer::Filer;
pub use scan::scan_note_files;
pub use searcher::Searcher;
