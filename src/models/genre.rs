/// Display names for the genre labels carried by the upstream catalog export.
/// The catalog front end is Portuguese; labels without an entry pass through
/// unchanged.
const GENRE_DISPLAY_PT: &[(&str, &str)] = &[
    ("Action", "Ação"),
    ("Adventure", "Aventura"),
    ("Comedy", "Comédia"),
    ("Drama", "Drama"),
    ("Animation", "Animação"),
    ("Fantasy", "Fantasia"),
    ("Horror", "Terror"),
    ("Science Fiction", "Ficção Científica"),
    ("Foreign", "Estrangeiro"),
    ("Crime", "Crime"),
    ("Thriller", "Suspense"),
    ("Mystery", "Mistério"),
    ("Romance", "Romance"),
    ("Documentary", "Documentário"),
    ("Family", "Família"),
    ("Western", "Faroeste"),
    ("History", "História"),
    ("Music", "Música"),
    ("War", "Guerra"),
];

/// Maps a single genre label to its display name
pub fn display_name(label: &str) -> &str {
    GENRE_DISPLAY_PT
        .iter()
        .find(|(source, _)| *source == label)
        .map(|(_, display)| *display)
        .unwrap_or(label)
}

/// Normalizes a raw genre field into distinct display tags
///
/// Accepts `|` or `,` as separators, trims each part, drops empties, and
/// keeps the first occurrence of repeated tags.
pub fn normalize_field(field: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for part in field.replace(',', "|").split('|') {
        let tag = part.trim();
        if tag.is_empty() {
            continue;
        }
        let tag = display_name(tag);
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_known_label() {
        assert_eq!(display_name("Horror"), "Terror");
        assert_eq!(display_name("Science Fiction"), "Ficção Científica");
    }

    #[test]
    fn test_display_name_unknown_label_passes_through() {
        assert_eq!(display_name("Film-Noir"), "Film-Noir");
    }

    #[test]
    fn test_normalize_field_pipe_separated() {
        assert_eq!(normalize_field("Action|Adventure"), vec!["Ação", "Aventura"]);
    }

    #[test]
    fn test_normalize_field_comma_separated() {
        assert_eq!(normalize_field("Comedy, Family"), vec!["Comédia", "Família"]);
    }

    #[test]
    fn test_normalize_field_drops_empties_and_duplicates() {
        assert_eq!(normalize_field("Drama||Drama| "), vec!["Drama"]);
        assert!(normalize_field("").is_empty());
        assert!(normalize_field(" | , ").is_empty());
    }
}
