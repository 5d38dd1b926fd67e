// src/analyzer/login.rs
// =============================================================================
// Guesses whether the page contains a login form.
//
// A <form> looks like a login form when it has all three of:
// 1. a credential field: text input, email input, or an input named "username"
// 2. a password input
// 3. a submit control: <input type="submit"> or <button type="submit">
//
// This is a heuristic. A sign-up form matches just as well.
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static FORM: Lazy<Selector> = Lazy::new(|| selector("form"));
static CREDENTIAL_FIELD: Lazy<Selector> = Lazy::new(|| {
    selector("input[type='text'], input[type='email'], input[name='username']")
});
static PASSWORD_FIELD: Lazy<Selector> = Lazy::new(|| selector("input[type='password']"));
static SUBMIT_CONTROL: Lazy<Selector> =
    Lazy::new(|| selector("input[type='submit'], button[type='submit']"));

/// True if any form on the page passes all three checks
pub fn has_login_form(document: &Html) -> bool {
    document.select(&FORM).any(|form| is_login_form(&form))
}

fn is_login_form(form: &ElementRef<'_>) -> bool {
    let contains = |selector: &Selector| form.select(selector).next().is_some();

    contains(&CREDENTIAL_FIELD) && contains(&PASSWORD_FIELD) && contains(&SUBMIT_CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(html: &str) -> bool {
        has_login_form(&Html::parse_document(html))
    }

    #[test]
    fn test_complete_login_form() {
        assert!(check(
            r#"<form>
                <input type="text" name="username"/>
                <input type="password" name="password"/>
                <button type="submit">Login</button>
            </form>"#
        ));
    }

    #[test]
    fn test_email_field_with_submit_input() {
        assert!(check(
            r#"<form>
                <input type="email" name="login"/>
                <input type="password" name="secret"/>
                <input type="submit" value="Sign in"/>
            </form>"#
        ));
    }

    #[test]
    fn test_username_name_without_type() {
        assert!(check(
            r#"<form>
                <input name="username"/>
                <input type="password"/>
                <input type="submit"/>
            </form>"#
        ));
    }

    #[test]
    fn test_text_input_only_is_not_login() {
        assert!(!check(r#"<form><input type="text" name="q"/></form>"#));
    }

    #[test]
    fn test_missing_submit_is_not_login() {
        assert!(!check(
            r#"<form><input type="text"/><input type="password"/><button>Go</button></form>"#
        ));
    }

    #[test]
    fn test_password_only_is_not_login() {
        assert!(!check(
            r#"<form><input type="password"/><input type="submit"/></form>"#
        ));
    }

    #[test]
    fn test_conditions_must_hold_within_one_form() {
        // Credentials in one form, password and submit in another
        assert!(!check(
            r#"<form><input type="text"/></form>
               <form><input type="password"/><input type="submit"/></form>"#
        ));
    }

    #[test]
    fn test_any_matching_form_is_enough() {
        assert!(check(
            r#"<form><input type="text" name="q"/></form>
               <form>
                   <input type="email"/><input type="password"/>
                   <button type="submit">Log in</button>
               </form>"#
        ));
    }

    #[test]
    fn test_no_forms() {
        assert!(!check("<html><body><p>Hello</p></body></html>"));
    }
}
