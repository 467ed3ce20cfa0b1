use sponge_derive::sponge_error;
use std::borrow::Cow;

#[sponge_error]
pub enum DemoError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i32> {
    let value = raw.parse::<i32>().context("parsing demo value")?;
    if value < 0 {
        return Err("negative".into());
    }
    Ok(value)
}

fn main() {
    assert_eq!(parse("7").ok(), Some(7));

    let err = parse("x").unwrap_err();
    assert!(matches!(err, DemoError::Parse { .. }));
    assert!(err.to_string().starts_with("Parse error (parsing demo value): "));

    let err = parse("-1").context("outer").unwrap_err();
    assert_eq!(err.to_string(), "Internal error (outer): negative");

    let lazy: Result<()> = Err(DemoError::from("boom")).with_context(|| format!("step {}", 3));
    assert_eq!(lazy.unwrap_err().to_string(), "Internal error (step 3): boom");
}
