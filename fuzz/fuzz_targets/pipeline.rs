#![no_main]

use libfuzzer_sys::fuzz_target;

use hackerdigest::links::{LinkExtractor, ListingLayout};
use hackerdigest::normalizer::Normalizer;

fuzz_target!(|data: &[u8]| {
    // Neither stage may panic, whatever the bytes
    let _ = Normalizer::default().normalize("https://example.com", data);

    let extractor = LinkExtractor::new(ListingLayout::hacker_news()).unwrap();
    if let Ok(links) = extractor.extract_top_links(data, 5) {
        assert!(links.len() <= 5);
        for link in links {
            assert!(link.starts_with("http://") || link.starts_with("https://"));
        }
    }
});
