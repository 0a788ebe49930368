//! Picks which scenarios to run from the command line

use std::io::Write;
use log::{debug, warn};
use crate::config::EndpointConfig;
use crate::console::Console;
use crate::runner::Scenarios;
use crate::{Scenario, ScenarioResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection
{   All
  , Only(Scenario)
  , Unknown(String)
}

impl Selection
{   /// Only the first positional argument is looked at
    pub fn from_args<I, S>(args: I) -> Self
    where
      I: IntoIterator<Item = S>
    , S: AsRef<str>
    {   match args.into_iter().next()
        {   None => Selection::All
          , Some(arg) => {
              let arg = arg.as_ref();
              match Scenario::from_name(arg)
              {   Some(scenario) => Selection::Only(scenario)
                , None => Selection::Unknown(arg.to_lowercase())
              }
            }
        }
    }

    pub fn scenarios(&self) -> Vec<Scenario>
    {   match self
        {   Selection::All => Scenario::ALL.to_vec()
          , Selection::Only(scenario) => vec![*scenario]
          , Selection::Unknown(_) => vec![]
        }
    }
}

/// Banner, the selected scenarios in order, footer.
/// A failed scenario never stops the next one.
pub async fn run<S, W>(
  selection: &Selection
, config: &EndpointConfig
, suite: &mut S
, console: &mut Console<W>
) -> Vec<(Scenario, ScenarioResult)>
where
  S: Scenarios
, W: Write
{   print_banner(config, console);

    let mut results = Vec::new();
    if let Selection::Unknown(name) = selection
    {   warn!("Unknown test requested: {}", name);
        console.line(format!("Unknown test: {}", name));
        let names: Vec<&str> = Scenario::ALL.iter()
          .map(|s| s.name())
          .collect();
        console.line(format!("Available tests: {}", names.join(", ")));
    }

    for scenario in selection.scenarios()
    {   debug!("Dispatching {:?}", scenario);
        let result = suite.run_scenario(scenario).await;
        results.push((scenario, result));
    }

    print_footer(console);
    results
}

fn print_banner<W: Write>(config: &EndpointConfig, console: &mut Console<W>)
{   console.blank();
    console.rule('=');
    console.centered("Minimal Client for the local Copilot API");
    console.rule('=');
    console.line(format!("API URL: {}", config.api_base()));
    console.line(
      "SECURITY NOTE: This client will ONLY connect to your local API server."
    );
    console.line("No connections to OpenAI servers will be made.");
    console.rule('-');
}

fn print_footer<W: Write>(console: &mut Console<W>)
{   console.blank();
    console.rule('=');
    console.centered("Tests completed");
    console.rule('=');
}
