use scraper::ElementRef;

/// Text nodes under `element`, each trimmed, empty ones dropped, joined by `sep`.
pub fn stripped_text(element: ElementRef<'_>, sep: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
