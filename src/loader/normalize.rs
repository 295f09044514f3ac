//! Column-name normalization

/// Normalize a column name the way every loader does before a table reaches
/// the comparator: fold accented letters to ASCII, uppercase, trim, and
/// replace internal whitespace with underscores.
pub fn normalize_column(name: &str) -> String {
    let folded: String = name.chars().map(fold_accent).collect();
    let trimmed = folded.trim();

    let mut out = String::with_capacity(trimmed.len());
    let mut last_was_sep = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            if !last_was_sep {
                out.push('_');
                last_was_sep = true;
            }
        } else {
            for upper in ch.to_uppercase() {
                out.push(upper);
            }
            last_was_sep = false;
        }
    }
    out
}

/// Normalize a list of user-supplied column names (key or ignore lists) so
/// they match loader-normalized table columns.
pub fn normalize_columns(names: &[String]) -> Vec<String> {
    names.iter().map(|n| normalize_column(n)).collect()
}

/// Fold one Latin accented letter to its ASCII base letter.
///
/// Covers the Latin-1 supplement plus the Latin Extended-A characters that
/// show up in Portuguese, Spanish, French and German headers. Anything else
/// passes through unchanged.
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'í' | 'ì' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ŏ' | 'Ő' => 'O',
        'ú' | 'ù' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' => 'U',
        'ç' | 'ć' | 'ĉ' | 'č' => 'c',
        'Ç' | 'Ć' | 'Ĉ' | 'Č' => 'C',
        'ñ' | 'ń' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ň' => 'N',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        'ś' | 'ŝ' | 'š' => 's',
        'Ś' | 'Ŝ' | 'Š' => 'S',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_trims() {
        assert_eq!(normalize_column("  name "), "NAME");
    }

    #[test]
    fn folds_accents() {
        assert_eq!(normalize_column("Código Região"), "CODIGO_REGIAO");
        assert_eq!(normalize_column("Über"), "UBER");
    }

    #[test]
    fn whitespace_runs_collapse_to_one_underscore() {
        assert_eq!(normalize_column("data  de\tnascimento"), "DATA_DE_NASCIMENTO");
    }

    #[test]
    fn already_normalized_names_pass_through() {
        assert_eq!(normalize_column("UPDATED_AT"), "UPDATED_AT");
    }

    #[test]
    fn normalizes_user_lists_like_headers() {
        let normalized = normalize_columns(&["código".into(), " id ".into()]);
        assert_eq!(normalized, vec!["CODIGO".to_string(), "ID".to_string()]);
    }
}
