//! Route handlers organized by resource

pub mod catalogue;
pub mod diagnostics;
pub mod documents;
pub mod faqs;
pub mod intake;
pub mod meta;
pub mod news;
pub mod partners;

#[cfg(test)]
pub(crate) mod test_support;
