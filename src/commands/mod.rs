pub mod batch;
pub mod extract;
pub mod ocr;
pub mod report;
