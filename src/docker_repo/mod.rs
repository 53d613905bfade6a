// Docker container listing and one-shot usage samples via bollard

mod stats;

use crate::models::{ContainerListing, ContainerState, RawUsageSample};
use crate::platform::ContainerPlatform;
use bollard::Docker;
use bollard::query_parameters::{InspectContainerOptions, ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use tracing::instrument;

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self { docker })
    }
}

#[async_trait::async_trait]
impl ContainerPlatform for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerListing>> {
        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(options)).await?;

        Ok(containers
            .into_iter()
            .map(|c| {
                let id = c.id.unwrap_or_default();
                let name = c
                    .names
                    .as_ref()
                    .and_then(|n| n.first())
                    .map(|n| n.trim_start_matches('/').to_string())
                    .unwrap_or_else(|| id.clone());
                let state = c
                    .state
                    .as_ref()
                    .map(|s| ContainerState::from_docker(&s.to_string()))
                    .unwrap_or(ContainerState::Unknown);
                ContainerListing {
                    id,
                    name,
                    image: c.image.unwrap_or_default(),
                    state,
                    status: c.status.unwrap_or_default(),
                }
            })
            .collect())
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "usage_sample"))]
    async fn usage_sample(&self, id: &str) -> anyhow::Result<RawUsageSample> {
        let options = StatsOptions {
            stream: false,
            one_shot: true,
        };
        let mut stream = self.docker.stats(id, Some(options));
        let inspect = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>);

        let (response, inspect) = tokio::join!(stream.next(), inspect);
        let response = response.ok_or_else(|| anyhow::anyhow!("empty stats stream for {}", id))??;
        let started_at = inspect?.state.and_then(|s| s.started_at);

        stats::usage_sample(&response, started_at)
            .ok_or_else(|| anyhow::anyhow!("stats for {} carry no cpu counters", id))
    }
}
