//! Scripted engine — a canned research run for test mode.
//!
//! Drives the whole display path (thoughts, an agent batch, code/result
//! steps with carriage-return progress output, a final paper) with no LLM or
//! GPU behind it. Also the reference for how a real engine should use a
//! `RunHandle`: announce the batch first, materialize agent records as they
//! spin up, append steps as they happen.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;

use crate::notebook::{Agent, ExperimentStep};

use super::{Engine, ExperimentConfig, ExperimentMode, RunHandle};

/// Build a scripted engine with the given pacing between beats. Use
/// `Duration::ZERO` in tests; the TUI default is a few hundred ms so the
/// timeline visibly streams.
pub fn engine(pace: Duration) -> Engine {
    Box::new(move |mode, config, handle| Box::pin(run_script(mode, config, handle, pace)))
}

async fn run_script(
    mode: ExperimentMode,
    config: ExperimentConfig,
    handle: RunHandle,
    pace: Duration,
) {
    debug!(%mode, "scripted engine starting");

    let num_agents = match mode {
        ExperimentMode::Single => 1,
        ExperimentMode::Orchestrator => config.num_agents.max(1) as usize,
    };

    handle
        .push_thought(format!(
            "Reading the research objective: **{}**.\n\n\
             Decomposing it into {num_agents} testable hypotheses and planning \
             one experiment per hypothesis (gpu: {}, max {} in parallel).",
            config.task, config.gpu, config.max_parallel
        ))
        .await;
    sleep(pace).await;

    handle
        .push_thought(
            "## Plan\n\n\
             1. Launch one agent per hypothesis.\n\
             2. Each agent runs its experiment and logs results.\n\
             3. Synthesize the findings into a paper."
                .to_string(),
        )
        .await;
    sleep(pace).await;

    // Announce the batch before the records exist — the display must
    // tolerate ids that have not materialized yet.
    let ids: Vec<String> = (0..num_agents).map(|_| Uuid::new_v4().to_string()).collect();
    handle.announce_agents(ids.clone()).await;
    sleep(pace).await;

    for (i, id) in ids.iter().enumerate() {
        let hypothesis = match mode {
            ExperimentMode::Single => config.task.clone(),
            ExperimentMode::Orchestrator => {
                format!("Variant {} of \"{}\" holds under ablation", i + 1, config.task)
            }
        };
        handle.register_agent(Agent::new(id.clone(), hypothesis)).await;

        handle
            .push_step(
                id,
                ExperimentStep::Thought {
                    content: "Setting up the environment, then running the benchmark."
                        .to_string(),
                },
            )
            .await;
        handle
            .push_step(
                id,
                ExperimentStep::Code {
                    content: format!("python run_experiment.py --trial {} --seed 42", i + 1),
                },
            )
            .await;
        sleep(pace).await;

        // tqdm-style output: one logical line redrawn via \r, then results.
        handle
            .push_step(
                id,
                ExperimentStep::Result {
                    content: "Preparing dataset...\n\
                              Training:   0%|          | 0/100\r\
                              Training:  50%|█████     | 50/100\r\
                              Training: 100%|██████████| 100/100\n\
                              eval_loss=0.231  eval_acc=0.914\n"
                        .to_string(),
                },
            )
            .await;
        handle
            .push_step(
                id,
                ExperimentStep::Thought {
                    content: "Accuracy holds within noise. Recording the run as support."
                        .to_string(),
                },
            )
            .await;
        sleep(pace).await;
    }

    handle
        .push_thought(format!(
            "All {num_agents} experiments finished in round 1 of {}. \
             The results agree; writing up.",
            config.max_rounds.max(1)
        ))
        .await;
    sleep(pace).await;

    handle
        .publish_paper(format!(
            "# {}\n\n\
             ## Abstract\n\n\
             We investigated the objective with {num_agents} autonomous agents. \
             All runs converged to consistent measurements.\n\n\
             ## Results\n\n\
             | Trial | eval_loss | eval_acc |\n\
             |---|---|---|\n\
             | 1 | 0.231 | 0.914 |\n\n\
             ## Conclusion\n\n\
             The hypothesis is supported by the collected evidence.",
            config.task
        ))
        .await;

    debug!("scripted engine finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::ItemKind;
    use crate::orchestrator::{FeedEvent, Orchestrator};

    async fn drive(mode: ExperimentMode, config: ExperimentConfig) -> Orchestrator {
        let orch = Orchestrator::new(engine(Duration::ZERO));
        let mut feed = orch.subscribe();
        orch.start_experiment(mode, config);
        loop {
            match feed.recv().await {
                Ok(FeedEvent::RunFinished) => break,
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
        orch
    }

    #[tokio::test]
    async fn orchestrator_script_emits_full_arc() {
        let mut config = ExperimentConfig::for_task("sparse attention scaling");
        config.test_mode = true;
        let orch = drive(ExperimentMode::Orchestrator, config).await;

        let state = orch.state();
        let s = state.lock().await;

        let kinds: Vec<ItemKind> = s.timeline.items().iter().map(|i| i.kind()).collect();
        assert_eq!(kinds.first(), Some(&ItemKind::Thought));
        assert_eq!(kinds.last(), Some(&ItemKind::Paper));
        assert_eq!(
            kinds.iter().filter(|k| **k == ItemKind::Agents).count(),
            1
        );

        // Every announced agent materialized with a populated step log.
        let announced = s
            .timeline
            .items()
            .iter()
            .find_map(|i| match i {
                crate::notebook::TimelineItem::Agents { agent_ids } => Some(agent_ids.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(announced.len(), 3);
        for id in &announced {
            let agent = s.agent(id).expect("announced agent materialized");
            assert!(agent.steps().len() >= 4);
            assert!(agent
                .steps()
                .iter()
                .any(|step| matches!(step, ExperimentStep::Result { content } if content.contains('\r'))));
        }
    }

    #[tokio::test]
    async fn single_mode_launches_one_agent_with_task_as_hypothesis() {
        let config = ExperimentConfig::for_task("fp8 training is stable");
        let orch = drive(ExperimentMode::Single, config).await;

        let state = orch.state();
        let s = state.lock().await;
        assert_eq!(s.agents.len(), 1);
        let agent = s.agents.values().next().unwrap();
        assert_eq!(agent.hypothesis, "fp8 training is stable");
    }

    #[tokio::test]
    async fn num_agents_zero_is_clamped() {
        let mut config = ExperimentConfig::for_task("t");
        config.num_agents = 0;
        let orch = drive(ExperimentMode::Orchestrator, config).await;

        let state = orch.state();
        let s = state.lock().await;
        assert_eq!(s.agents.len(), 1);
    }
}
