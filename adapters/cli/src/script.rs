//! Line-oriented player scripts driving a battle from the terminal.

use thiserror::Error;
use to_arms_core::CellCoord;

/// Single player action read from a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Click on a cell: move there or attack whoever stands on it.
    Click(CellCoord),
    /// Point at a cell without clicking.
    Hover(CellCoord),
    /// End the active unit's turn.
    EndTurn,
    /// Print the roster.
    Status,
}

/// Reasons a script line could not be understood.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The first word is not a known action.
    #[error("line {line}: unknown action `{word}`")]
    UnknownAction { line: usize, word: String },
    /// The action expects a cell but the coordinates are missing or malformed.
    #[error("line {line}: `{word}` expects two integer coordinates")]
    InvalidCell { line: usize, word: String },
    /// The action received arguments it does not take.
    #[error("line {line}: `{word}` takes no arguments")]
    UnexpectedArguments { line: usize, word: String },
}

/// Parses a whole script. Blank lines and `#` comments are skipped.
pub(crate) fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let mut words = content.split_whitespace();
        let Some(word) = words.next() else {
            continue;
        };
        let arguments: Vec<&str> = words.collect();

        let step = match word {
            "click" => Step::Click(parse_cell(line, word, &arguments)?),
            "hover" => Step::Hover(parse_cell(line, word, &arguments)?),
            "end" => {
                expect_no_arguments(line, word, &arguments)?;
                Step::EndTurn
            }
            "status" => {
                expect_no_arguments(line, word, &arguments)?;
                Step::Status
            }
            _ => {
                return Err(ScriptError::UnknownAction {
                    line,
                    word: word.to_owned(),
                })
            }
        };
        steps.push(step);
    }
    Ok(steps)
}

fn parse_cell(line: usize, word: &str, arguments: &[&str]) -> Result<CellCoord, ScriptError> {
    let invalid = || ScriptError::InvalidCell {
        line,
        word: word.to_owned(),
    };
    let [x, y] = arguments else {
        return Err(invalid());
    };
    let x = x.parse::<i32>().map_err(|_| invalid())?;
    let y = y.parse::<i32>().map_err(|_| invalid())?;
    Ok(CellCoord::new(x, y))
}

fn expect_no_arguments(line: usize, word: &str, arguments: &[&str]) -> Result<(), ScriptError> {
    if arguments.is_empty() {
        Ok(())
    } else {
        Err(ScriptError::UnexpectedArguments {
            line,
            word: word.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_action_and_skips_comments() {
        let script = "
            # opening
            status
            hover 2 -1
            click 3 4   # charge
            end
        ";

        let steps = parse(script).expect("script should parse");

        assert_eq!(
            steps,
            vec![
                Step::Status,
                Step::Hover(CellCoord::new(2, -1)),
                Step::Click(CellCoord::new(3, 4)),
                Step::EndTurn,
            ]
        );
    }

    #[test]
    fn unknown_actions_report_their_line() {
        let error = parse("status\nretreat").expect_err("retreat is not an action");

        assert_eq!(
            error,
            ScriptError::UnknownAction {
                line: 2,
                word: "retreat".to_owned(),
            }
        );
    }

    #[test]
    fn clicks_need_two_integers() {
        assert!(matches!(
            parse("click 1"),
            Err(ScriptError::InvalidCell { line: 1, .. })
        ));
        assert!(matches!(
            parse("click a b"),
            Err(ScriptError::InvalidCell { line: 1, .. })
        ));
        assert!(matches!(
            parse("end now"),
            Err(ScriptError::UnexpectedArguments { line: 1, .. })
        ));
    }
}
