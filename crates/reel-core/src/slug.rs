//! URL-safe slugs for project routing keys and category segments.

fn fold(c: char) -> Option<char> {
  let folded = match c {
    'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
    'é' | 'è' | 'ë' | 'ê' => 'e',
    'í' | 'ì' | 'ï' | 'î' => 'i',
    'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
    'ú' | 'ù' | 'ü' | 'û' => 'u',
    'ñ' => 'n',
    'ç' => 'c',
    c if c.is_ascii_alphanumeric() => c,
    _ => return None,
  };
  Some(folded)
}

/// Lowercase `text`, fold common Latin diacritics, and join the remaining
/// alphanumeric runs with single hyphens.
///
/// ```
/// assert_eq!(reel_core::slug::slugify("  Música & Vídeo! "), "musica-video");
/// ```
pub fn slugify(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut pending_dash = false;

  for c in text.chars().flat_map(char::to_lowercase) {
    match fold(c) {
      Some(c) => {
        if pending_dash && !out.is_empty() {
          out.push('-');
        }
        pending_dash = false;
        out.push(c);
      }
      None => pending_dash = true,
    }
  }
  out
}
