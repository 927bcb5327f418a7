use std::collections::HashMap;
use std::path::Path;
use std::fs::read_to_string;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{anyhow, bail, Result};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use serde::Deserialize;
use vow::{Deferred, Promises};
use vow::promise::{Config, Duplicate, Pool};
mod common;

const TYPED:   &str = "THE TYPED ERROR!";
const UNTYPED: &str = "THE UNTYPED ERROR!";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Test {
    ops:        Vec<String>,
    resolved:   Option<String>,
    rejected:   Option<String>,
    duplicates: Vec<String>,
}

fn produce(ops: Vec<String>, seen: Arc<Mutex<Vec<Duplicate>>>, done: Sender<()>) -> impl FnOnce(Deferred<String>) -> Result<()> + Send + 'static {
    move |deferred| {
        let _done = done;
        for op in ops {
            let result = match op.as_str() {
                "resolve" => deferred.resolve(common::RESPONSE.to_owned()),
                "reject"  => deferred.reject(anyhow!(TYPED)),
                "fail"    => bail!(UNTYPED),
                "panic"   => panic!("THE PANIC!"),
                other     => bail!("unknown op {other}"),
            };
            if let Err(duplicate) = result {
                seen.lock().push(duplicate);
            }
        }
        Ok(())
    }
}

fn duplicate(name: &str) -> Result<Duplicate> {
    Ok(match name {
        "resolved-twice"          => Duplicate::ResolvedTwice,
        "rejected-twice"          => Duplicate::RejectedTwice,
        "rejected-after-resolved" => Duplicate::RejectedAfterResolved,
        "resolved-after-rejected" => Duplicate::ResolvedAfterRejected,
        other                     => bail!("unknown duplicate {other}"),
    })
}

#[test]
fn test() -> Result<()> {
    common::init();

    let (pool, _guard) = Pool::new(Config {
        workers: 2,
        name:    "settlement".to_owned(),
    }).exec()?;

    let path = Path::new(env!("CARGO_MANIFEST_DIR"));
    let file = path.join("tests/tests.yml");
    let data = read_to_string(file)?;

    let tests = serde_yaml::from_str::<HashMap<String, Test>>(&data)?;

    for (name, test) in tests {
        println!("  test: {name}");

        let seen     = Arc::new(Mutex::new(Vec::new()));
        let resolved = common::History::<String>::new();
        let rejected = common::History::<String>::new();

        let (done, finished) = bounded(0);

        let promise = Promises::on(&pool, produce(test.ops, seen.clone(), done));
        let record  = rejected.clone();

        promise.clone()
            .then(resolved.recorder())
            .error(move |failure| record.record(failure.to_string()))
            .wait()?;

        let finished = finished.recv_timeout(Duration::from_secs(1));
        assert_eq!(finished, Err(RecvTimeoutError::Disconnected), "{name}");

        assert_eq!(resolved.entries(), test.resolved.iter().cloned().collect::<Vec<_>>(), "{name}");
        assert_eq!(rejected.entries(), test.rejected.iter().cloned().collect::<Vec<_>>(), "{name}");

        let expected = test.duplicates.iter().map(|d| duplicate(d)).collect::<Result<Vec<_>>>()?;
        assert_eq!(*seen.lock(), expected, "{name}");

        let outcome = promise.get(Duration::from_secs(1)).map_err(|e| e.to_string());
        match (&test.resolved, &test.rejected) {
            (Some(value), None) => assert_eq!(outcome, Ok(value.clone()), "{name}"),
            (None, Some(cause)) => assert_eq!(outcome, Err(cause.clone()), "{name}"),
            _                   => bail!("{name}: expect exactly one outcome"),
        }
    }

    Ok(())
}
