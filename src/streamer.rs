use std::{error::Error, io};

use crate::responder::Responder;

/// Feeds query strings to a responder and writes back one JSON answer per query.
pub struct Streamer<In, Out, Err>
where
    In: Iterator<Item = Result<String, Err>>,
    Out: FnMut(String),
{
    queries: In,
    write: Out,
}

impl<In, Out, Err> Streamer<In, Out, Err>
where
    In: Iterator<Item = Result<String, Err>>,
    Out: FnMut(String),
    Err: Error + 'static,
{
    pub fn new(queries: In, write: Out) -> Self {
        Self { queries, write }
    }

    /// Blank lines are skipped.
    pub fn run(
        mut streamer: Streamer<In, Out, Err>,
        responder: &Responder,
    ) -> Result<(), Box<dyn Error>> {
        for input in streamer.queries {
            let query = input?;
            if query.trim().is_empty() {
                continue;
            }
            let output = responder.respond(&query)?;
            (streamer.write)(output);
        }
        Ok(())
    }
}

pub fn stdio() -> (impl Iterator<Item = Result<String, io::Error>>, impl FnMut(String)) {
    let queries = io::stdin().lines();
    let write = |output: String| println!("{}", output);
    (queries, write)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::GridConfig;
    use crate::responder::{tests::build_points, Settings};
    use crate::streamer::*;
    use regex::Regex;

    const OUT_PATTERN: &str = r#"^\{"present":\[(\[((null|\{[^}]*\}),?)*\],?)*\],"disappeared":\[(\[((null|\{[^}]*\}),?)*\],?)*\]\}$"#;

    #[test]
    fn test_streamer() {
        let settings = Settings {
            grid: GridConfig {
                width: 3,
                height: 2,
            },
            ..Settings::default()
        };
        let responder = Responder::new(Arc::new(build_points()), settings);
        let queries = vec![
            "north=2&south=0&east=2&west=0",
            "",
            "north=1.6&south=1.4&east=0.6&west=0.4&width=1&height=1",
        ]
        .into_iter()
        .map(|q| -> Result<String, io::Error> { Ok(q.to_string()) });
        let mut result: Vec<String> = vec![];
        let write = |output: String| result.push(output);
        let streamer = Streamer::new(queries, write);
        match Streamer::run(streamer, &responder) {
            Ok(()) => {
                let re = Regex::new(OUT_PATTERN).unwrap();
                assert_eq!(2, result.len());
                assert!(result.iter().all(|r| re.is_match(r)));
                assert_eq!(
                    r#"{"present":[[{"count":1,"lat":1.5,"lng":0.5,"id":1}]],"disappeared":[[{"count":1,"lat":1.5,"lng":0.5,"id":2}]]}"#,
                    result[1]
                );
            }
            Err(_) => {
                assert!(false)
            }
        };
    }

    #[test]
    fn test_streamer_input_error() {
        let responder = Responder::new(Arc::new(vec![]), Settings::default());
        let queries: Vec<Result<String, io::Error>> =
            vec![Err(io::Error::new(io::ErrorKind::Other, "broken pipe"))];
        let streamer = Streamer::new(queries.into_iter(), |_output: String| {});
        assert!(Streamer::run(streamer, &responder).is_err());
    }
}
