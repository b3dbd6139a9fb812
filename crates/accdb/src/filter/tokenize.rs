use crate::error::FilterSyntaxError;

/// Splits filter text into top-level tokens.
///
/// Tokens are separated by whitespace outside parentheses. A parenthesized
/// group becomes one token holding the text between its outer parentheses,
/// so `(AND a (OR b c))` yields `["AND a (OR b c)"]`, and splitting that
/// again yields `["AND", "a", "OR b c"]`.
pub fn split_filter(text: &str) -> Result<Vec<&str>, FilterSyntaxError> {
    let mut tokens = Vec::new();
    let mut depth: isize = 0;
    let mut start: Option<usize> = None;

    for (pos, c) in text.char_indices() {
        match c {
            '(' => {
                if depth == 0 {
                    if let Some(from) = start {
                        push_token(&mut tokens, &text[from..pos]);
                    }
                    start = Some(pos + 1);
                }
                depth += 1;
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(FilterSyntaxError::ExtraCloseParen { depth });
                }
                if depth == 0 {
                    if let Some(from) = start.take() {
                        push_token(&mut tokens, &text[from..pos]);
                    }
                }
            }
            c if c.is_whitespace() => {
                if depth == 0 {
                    if let Some(from) = start.take() {
                        push_token(&mut tokens, &text[from..pos]);
                    }
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(pos);
                }
            }
        }
    }

    if depth > 0 {
        return Err(FilterSyntaxError::UnclosedParen {
            depth: depth.unsigned_abs(),
        });
    }
    if let Some(from) = start {
        push_token(&mut tokens, &text[from..]);
    }

    Ok(tokens)
}

fn push_token<'a>(tokens: &mut Vec<&'a str>, token: &'a str) {
    if !token.is_empty() {
        tokens.push(token);
    }
}
