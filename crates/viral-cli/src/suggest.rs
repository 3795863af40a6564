//! Curated topic suggestions per locale.

use viral_core::Language;

pub fn run(language: &str) {
    let language = Language::from_tag(language);
    println!("Try:");
    for suggestion in viral_core::topic_suggestions(language) {
        println!("  {suggestion}");
    }
}
