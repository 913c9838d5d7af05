/// Lowercase `text` and split it on Unicode whitespace.
///
/// Punctuation stays attached to its word ("farm." and "farm" are distinct
/// terms). Both vocabulary building and embedding go through here.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_owned).collect()
}
