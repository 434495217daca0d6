use gust_runner::prelude::{OperationTimer, ViewerControl, ViewerOp};
use serde_json::json;

use crate::configs;

/// Churn through a series of configuration changes on one viewer.
///
/// Every timed step settles before the next begins. The untimed attribute
/// writes between steps put the viewer into a known state without polluting
/// the measurements; if one of those fails the whole run fails, which is
/// deliberate since the following measurements would be meaningless.
pub async fn churn<H>(viewer: &H, timer: &mut OperationTimer) -> anyhow::Result<()>
where
    H: ViewerControl,
{
    timer.timeit("Load page", viewer, ViewerOp::WaitForIdle).await?;

    for (index, config) in configs::catalog().into_iter().enumerate() {
        timer
            .timeit(
                &format!("Restore config {}", index),
                viewer,
                ViewerOp::Restore(config),
            )
            .await?;
    }

    timer.timeit("Reset", viewer, ViewerOp::Reset).await?;
    viewer
        .dispatch(set_attribute("sort", json!([["last_update", "desc"]])))
        .await?;

    timer
        .timeit(
            "Add 3 numeric computed columns",
            viewer,
            set_attribute(
                "computed-columns",
                json!(["((pow2('high')) + 'low') / 'open' as 'computed'"]),
            ),
        )
        .await?;

    timer
        .timeit(
            "Set columns",
            viewer,
            set_attribute("columns", json!(["computed", "high", "low", "open"])),
        )
        .await?;

    timer
        .timeit(
            "Set row pivots (deep)",
            viewer,
            set_attribute("row-pivots", json!(["exchange", "type", "name"])),
        )
        .await?;

    viewer
        .dispatch(set_attribute("row-pivots", json!([])))
        .await?;
    timer
        .timeit(
            "Set column pivots (deep)",
            viewer,
            set_attribute("column-pivots", json!(["exchange", "type", "name"])),
        )
        .await?;

    timer
        .timeit(
            "Set row and column pivots (deep)",
            viewer,
            set_attribute("row-pivots", json!(["exchange", "type", "name"])),
        )
        .await?;

    viewer
        .dispatch(set_attribute("column-pivots", json!([])))
        .await?;
    timer
        .timeit(
            "Set filter",
            viewer,
            set_attribute("filters", json!([["name", "==", "FB.N"]])),
        )
        .await?;

    timer.timeit("Reset again", viewer, ViewerOp::Reset).await?;
    viewer
        .dispatch(set_attribute("sort", json!([["last_update", "desc"]])))
        .await?;

    timer
        .timeit(
            "New set of row pivots",
            viewer,
            set_attribute("row-pivots", json!(["client", "name"])),
        )
        .await?;

    timer
        .timeit(
            "Add 3 string computed columns",
            viewer,
            set_attribute(
                "computed-columns",
                json!([
                    "concat_comma('client', 'name') as 'identifier'",
                    "uppercase('type')",
                    "lowercase('name')"
                ]),
            ),
        )
        .await?;

    timer
        .timeit(
            "Set computed as row pivots",
            viewer,
            set_attribute("row-pivots", json!(["identifier"])),
        )
        .await?;

    timer.timeit("Final reset", viewer, ViewerOp::Reset).await?;

    Ok(())
}

fn set_attribute(attribute: &str, value: serde_json::Value) -> ViewerOp {
    ViewerOp::SetAttribute {
        attribute: attribute.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gust_instruments::ResultsSink;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    struct RecordingViewer {
        dispatched: Arc<Mutex<Vec<ViewerOp>>>,
    }

    #[async_trait]
    impl ViewerControl for RecordingViewer {
        fn instance_name(&self) -> &str {
            "0"
        }

        fn viewer_name(&self) -> &str {
            "0"
        }

        async fn dispatch(&self, op: ViewerOp) -> anyhow::Result<()> {
            self.dispatched.lock().unwrap().push(op);
            Ok(())
        }

        async fn screenshot(&self, _name: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn script_produces_a_stable_description_sequence() {
        let expected = vec![
            "Load page",
            "Restore config 0",
            "Restore config 1",
            "Restore config 2",
            "Reset",
            "Add 3 numeric computed columns",
            "Set columns",
            "Set row pivots (deep)",
            "Set column pivots (deep)",
            "Set row and column pivots (deep)",
            "Set filter",
            "Reset again",
            "New set of row pivots",
            "Add 3 string computed columns",
            "Set computed as row pivots",
            "Final reset",
        ];

        let mut descriptions = Vec::new();
        for _ in 0..2 {
            let viewer = RecordingViewer {
                dispatched: Arc::new(Mutex::new(Vec::new())),
            };
            let sink = ResultsSink::new();
            let mut timer = OperationTimer::new("0".to_string(), sink.clone());

            churn(&viewer, &mut timer).await.unwrap();

            assert_eq!(expected.len() as u64, timer.operation_count());
            descriptions.push(
                sink.snapshot()
                    .into_iter()
                    .map(|r| (r.description, r.success))
                    .collect::<Vec<_>>(),
            );
        }

        // The same script against a fresh handle produces the same sequence.
        assert_eq!(descriptions[0], descriptions[1]);
        assert_eq!(
            expected,
            descriptions[0]
                .iter()
                .map(|(description, _)| description.as_str())
                .collect::<Vec<_>>()
        );
        assert!(descriptions[0].iter().all(|(_, success)| *success));
    }

    #[tokio::test]
    async fn untimed_attribute_writes_are_dispatched_but_not_recorded() {
        let dispatched = Arc::new(Mutex::new(Vec::new()));
        let viewer = RecordingViewer {
            dispatched: dispatched.clone(),
        };
        let sink = ResultsSink::new();
        let mut timer = OperationTimer::new("0".to_string(), sink.clone());

        churn(&viewer, &mut timer).await.unwrap();

        // Four untimed sort/pivot writes between the timed steps.
        assert_eq!(
            dispatched.lock().unwrap().len() as u64,
            timer.operation_count() + 4
        );
        assert_eq!(sink.len() as u64, timer.operation_count());
    }
}
