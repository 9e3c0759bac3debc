//! Train [`Agent`].
mod config;
use crate::{
    record::{Record, RecordValue, RecordValue::Scalar, Recorder},
    replay_buffer::{BatchBase, ReplayBuffer},
    Agent, Env, Evaluator,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::{borrow::Borrow, marker::PhantomData, path::PathBuf, time::SystemTime};

/// Manages the off-policy training loop.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`], a replay buffer, a recorder
///    implementing [`Recorder`] and an evaluator implementing [`Evaluator`].
/// 1. Build the training environment with the configured seed. Evaluate the
///    untrained agent; it is the best model until an evaluation beats it.
/// 2. For `t` in `0..max_timesteps`:
///     1. Take a uniformly random action while `t < start_timesteps`, the
///        action of the agent afterwards.
///     2. Step the environment and add the transition to the buffer. The
///        stored done flag is `is_terminated && episode_steps < max_episode_steps`,
///        so reaching the time limit is never treated as a terminal state.
///     3. If `t >= start_timesteps`, the buffer holds at least `batch_size`
///        transitions and `(t + 1) % opt_interval == 0`, do an optimization step.
///     4. At the end of an episode (termination, truncation or time limit),
///        log its summary and reset the environment.
///     5. If `(t + 1) % eval_freq == 0`, evaluate the agent and write
///        `"eval_reward"`, `"buffer_len"` and `"datetime"` to the recorder.
///        Parameters are saved in `(model_dir)/policy_(t)`, and in
///        `(model_dir)/best` when the evaluation is the best so far.
pub struct Trainer<E: Env> {
    config: TrainerConfig,
    env_config: E::Config,
    phantom: PhantomData<E>,
}

/// Counters of a finished training run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainStats {
    /// Environment steps.
    pub env_steps: usize,

    /// Optimization steps.
    pub opt_steps: usize,

    /// Completed episodes.
    pub episodes: usize,

    /// Best evaluation return, including the evaluation of the untrained agent.
    pub best_eval_reward: f32,
}

impl<E: Env> Trainer<E> {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig, env_config: E::Config) -> Self {
        Self {
            config,
            env_config,
            phantom: PhantomData,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    fn save_model<A, P>(agent: &P, model_dir: PathBuf)
    where
        A: BatchBase,
        E::Act: Borrow<A::Item>,
        P: Agent<E, A>,
    {
        let res = std::fs::create_dir_all(&model_dir)
            .map_err(anyhow::Error::from)
            .and_then(|_| agent.save_params(&model_dir));
        match res {
            Ok(()) => info!("Saved the model in {:?}", &model_dir),
            Err(e) => warn!("Failed to save the model in {:?}: {}", &model_dir, e),
        }
    }

    fn evaluate<A, P, D>(agent: &mut P, evaluator: &mut D, buffer_len: usize) -> Result<Record>
    where
        A: BatchBase,
        E::Act: Borrow<A::Item>,
        P: Agent<E, A>,
        D: Evaluator<E, P>,
    {
        agent.eval();
        let mut record = evaluator.evaluate(agent)?;
        agent.train();
        record.insert("buffer_len", Scalar(buffer_len as f32));
        record.insert("datetime", RecordValue::DateTime(Local::now()));
        Ok(record)
    }

    /// Train the agent.
    pub fn train<A, P, D>(
        &mut self,
        agent: &mut P,
        buffer: &mut ReplayBuffer<A>,
        recorder: &mut dyn Recorder,
        evaluator: &mut D,
    ) -> Result<TrainStats>
    where
        A: BatchBase,
        E::Act: Borrow<A::Item>,
        P: Agent<E, A>,
        D: Evaluator<E, P>,
    {
        let config = &self.config;
        let timer = SystemTime::now();
        let mut env = E::build(&self.env_config, config.seed)?;
        let mut rng = StdRng::seed_from_u64(config.seed as u64);
        let max_episode_steps = env.max_episode_steps();
        let opt_interval = config.opt_interval.max(1);
        let eval_freq = config.eval_freq.max(1);
        let record_interval = config.record_interval.max(1);
        info!(
            "Start training, max_timesteps: {}, seed: {}",
            config.max_timesteps, config.seed
        );

        // Evaluate untrained policy, the first best model
        let record = Self::evaluate::<A, P, D>(agent, evaluator, buffer.len())?;
        let mut stats = TrainStats {
            best_eval_reward: record.get_scalar("eval_reward")?,
            ..Default::default()
        };
        recorder.write(0, record);
        if let Some(model_dir) = &config.model_dir {
            Self::save_model::<A, P>(agent, PathBuf::from(model_dir).join("best"));
        }

        let mut state = env.reset()?;
        let mut episode_reward = 0f32;
        let mut episode_steps = 0usize;

        for t in 0..config.max_timesteps {
            episode_steps += 1;

            let act = if t < config.start_timesteps {
                env.random_action(&mut rng)
            } else {
                agent.sample(&state)?
            };
            let step = env.step(&act)?;
            let done = step.is_terminated && episode_steps < max_episode_steps;
            let row: &A::Item = act.borrow();
            buffer.add(&state, row, &step.next_state, step.reward, done)?;
            episode_reward += step.reward;
            stats.env_steps += 1;

            // Train agent after collecting sufficient data
            if t >= config.start_timesteps
                && buffer.len() >= config.batch_size
                && (t + 1) % opt_interval == 0
            {
                let record = agent.opt(buffer)?;
                stats.opt_steps += 1;
                if stats.opt_steps % record_interval == 0 && !record.is_empty() {
                    recorder.write(t + 1, record);
                }
            }

            if step.is_done() || episode_steps >= max_episode_steps {
                info!(
                    "Total T: {} Episode Num: {} Episode T: {} Reward: {:.3}",
                    t + 1,
                    stats.episodes + 1,
                    episode_steps,
                    episode_reward
                );
                state = env.reset()?;
                episode_reward = 0.;
                episode_steps = 0;
                stats.episodes += 1;
            } else {
                state = step.next_state;
            }

            if (t + 1) % eval_freq == 0 {
                let record = Self::evaluate::<A, P, D>(agent, evaluator, buffer.len())?;
                let eval_reward = record.get_scalar("eval_reward")?;
                recorder.write(t, record);

                if let Some(model_dir) = &config.model_dir {
                    let model_dir = PathBuf::from(model_dir);
                    Self::save_model::<A, P>(agent, model_dir.join(format!("policy_{}", t)));
                    if eval_reward > stats.best_eval_reward {
                        Self::save_model::<A, P>(agent, model_dir.join("best"));
                    }
                }
                if eval_reward > stats.best_eval_reward {
                    stats.best_eval_reward = eval_reward;
                }
            }
        }

        let total_time = timer.elapsed()?.as_secs_f32();
        info!(
            "Training time: {} hours {:.3} minutes",
            (total_time / 3600.).floor(),
            (total_time % 3600.) / 60.
        );

        Ok(stats)
    }
}
