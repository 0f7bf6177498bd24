/// Keywords that route a prompt to the image-generation path. Matched as
/// literal substrings of the lower-cased prompt, so a keyword inside a
/// longer word still triggers image mode; false positives are accepted
/// in exchange for a zero-cost classifier.
const IMAGE_KEYWORDS: &[&str] = &[
    "generate",
    "create",
    "make",
    "draw",
    "design",
    "picture",
    "image",
    "photo",
    "illustration",
    "render",
    "visualize",
    "show me",
    "gawa",
    "landscape",
    "portrait",
    "scene",
    "artwork",
    "painting",
    "sketch",
    "drawing",
    "graphic",
    "logo",
    "poster",
    "banner",
    "thumbnail",
];

/// Classifies a free-text prompt as an image request or a text request.
///
/// Stateless and side-effect free. The keyword set can be swapped out,
/// but the semantics stay case-insensitive literal substring matching;
/// no entry is treated as a regular expression.
#[derive(Debug, Clone)]
pub struct RequestRouter {
    keywords: Vec<String>,
}

impl Default for RequestRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestRouter {
    pub fn new() -> Self {
        Self::with_keywords(IMAGE_KEYWORDS.iter().map(|kw| kw.to_string()))
    }

    pub fn with_keywords(keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|kw| kw.to_lowercase())
                .filter(|kw| !kw.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_image_request(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|kw| lowered.contains(kw.as_str()))
    }
}
