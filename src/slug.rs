//! URL slug generation.
//!
//! Catalog names come from merchandisers in both Latin and Cyrillic script,
//! so slugification transliterates Cyrillic before the usual lowercase /
//! hyphenate pass. Scoped uniqueness is enforced by the services; only
//! Product slugs are auto-disambiguated (see `ProductService::create_product`).

/// Convert a human name into a URL-safe slug.
///
/// Lowercases, transliterates Cyrillic characters, maps every other
/// non-alphanumeric run to a single hyphen, and trims leading/trailing
/// hyphens. An all-symbol input produces an empty slug; callers treat that
/// as a validation failure.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    let push = |s: &str, out: &mut String, pending: &mut bool| {
        if *pending && !out.is_empty() {
            out.push('-');
        }
        *pending = false;
        out.push_str(s);
    };

    for ch in name.chars().flat_map(|c| c.to_lowercase()) {
        match ch {
            'a'..='z' | '0'..='9' => {
                push(ch.encode_utf8(&mut [0u8; 4]), &mut out, &mut pending_hyphen)
            }
            // Hard and soft signs carry no sound; they vanish without a hyphen.
            'ъ' | 'ь' => {}
            _ => match transliterate(ch) {
                Some(mapped) => push(mapped, &mut out, &mut pending_hyphen),
                None => pending_hyphen = true,
            },
        }
    }

    out
}

/// Append a numeric collision suffix: `classic-tap` + 1 → `classic-tap-1`.
pub fn with_suffix(base: &str, counter: u32) -> String {
    format!("{}-{}", base, counter)
}

/// GOST-style romanization for the Cyrillic range. `None` means the character
/// is a separator (whitespace, punctuation, unsupported script).
fn transliterate(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'э' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ы' => "y",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_latin_names() {
        assert_eq!(slugify("Classic Tap"), "classic-tap");
        assert_eq!(slugify("LED"), "led");
        assert_eq!(slugify("Bath furniture"), "bath-furniture");
    }

    #[test]
    fn punctuation_collapses_to_single_hyphen() {
        assert_eq!(slugify("Solo / Harmony"), "solo-harmony");
        assert_eq!(slugify("  Omega   Deluxe  "), "omega-deluxe");
        assert_eq!(slugify("100% Cotton"), "100-cotton");
    }

    #[test]
    fn cyrillic_names_are_transliterated() {
        assert_eq!(slugify("Зеркала"), "zerkala");
        assert_eq!(slugify("Мебель"), "mebel");
        assert_eq!(slugify("Водонагреватели"), "vodonagrevateli");
    }

    #[test]
    fn mixed_script_name() {
        assert_eq!(slugify("Lamis Премиум 60"), "lamis-premium-60");
    }

    #[test]
    fn hard_and_soft_signs_vanish_without_hyphen() {
        assert_eq!(slugify("Подъезд"), "podezd");
    }

    #[test]
    fn no_leading_or_trailing_hyphens() {
        assert_eq!(slugify("--Tap--"), "tap");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn collision_suffix() {
        assert_eq!(with_suffix("classic-tap", 1), "classic-tap-1");
        assert_eq!(with_suffix("classic-tap", 12), "classic-tap-12");
    }
}
