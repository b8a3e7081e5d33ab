//! Display labels for OSM `shop` codes.

/// Key used when a feature carries no `shop` tag, or an empty one.
pub const FALLBACK: &str = "outros";

const TRANSLATIONS: &[(&str, &str)] = &[
    ("supermarket", "Supermercado"),
    ("convenience", "Conveniência"),
    ("clothes", "Roupas"),
    ("bakery", "Padaria"),
    ("butcher", "Açougue"),
    ("shoes", "Calçados"),
    ("electronics", "Eletrônicos"),
    ("mobile_phone", "Celulares"),
    ("furniture", "Móveis"),
    ("department_store", "Loja de Departamento"),
    ("mall", "Shopping"),
    ("hardware", "Materiais de Construção"),
    ("outros", "Outros"),
];

pub fn classify(raw: Option<&str>) -> String {
    let raw = raw.filter(|x| !x.is_empty()).unwrap_or(FALLBACK);
    let key = raw.to_lowercase();
    if let Some((_, label)) = TRANSLATIONS.iter().find(|(code, _)| *code == key) {
        return label.to_string();
    }

    format_code(raw)
}

// only the first underscore is replaced, `a_b_c` becomes `A b_c`
fn format_code(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => {
            let mut label: String = first.to_uppercase().collect();
            label.push_str(&chars.as_str().replacen('_', " ", 1));
            label
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        for (code, label) in TRANSLATIONS {
            assert_eq!(classify(Some(*code)), *label);
        }
        assert_eq!(classify(Some("SuperMarket")), "Supermercado");
        assert_eq!(classify(Some("MOBILE_PHONE")), "Celulares");
    }

    #[test]
    fn missing_tag() {
        assert_eq!(classify(None), "Outros");
        assert_eq!(classify(Some("")), "Outros");
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(classify(Some("unknown_type")), "Unknown type");
        assert_eq!(classify(Some("a_b_c")), "A b_c");
        assert_eq!(classify(Some("books")), "Books");
        assert_eq!(classify(Some("_x")), "_x");
        assert_eq!(classify(Some("óptica_x")), "Óptica x");
    }
}
