//! Kakao Maps binding.
//!
//! The server never talks to a live map. [`KakaoSdk`] journals every map call as a
//! [`MapCommand`]; the page script replays the journal against `kakao.maps` in the browser.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tripview_map::{Bounds, LatLng, MapError, MapResult, MapSdk, ScriptSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapCommand {
    CreateMap {
        center: LatLng,
        level: u8,
    },
    AddOverlay {
        id: u32,
        position: LatLng,
        label: String,
    },
    RemoveOverlay {
        id: u32,
    },
    SetBounds {
        sw: LatLng,
        ne: LatLng,
    },
}

/// Map handle: pending commands for one browser-side map instance.
#[derive(Debug, Default)]
pub struct ScriptMap {
    next_overlay: u32,
    commands: Vec<MapCommand>,
}

impl ScriptMap {
    pub fn take_commands(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayId(pub u32);

/// Loaded SDK script, served to browsers from `/map/sdk.js`.
#[derive(Debug)]
pub struct KakaoSdk {
    script: String,
}

impl KakaoSdk {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }
}

impl MapSdk for KakaoSdk {
    type Map = ScriptMap;
    type Overlay = OverlayId;

    fn create_map(&self, center: LatLng, level: u8) -> ScriptMap {
        ScriptMap {
            next_overlay: 0,
            commands: vec![MapCommand::CreateMap { center, level }],
        }
    }

    fn create_overlay(&self, map: &mut ScriptMap, position: LatLng, label: &str) -> OverlayId {
        map.next_overlay += 1;
        let id = map.next_overlay;

        map.commands.push(MapCommand::AddOverlay {
            id,
            position,
            label: label.to_owned(),
        });

        OverlayId(id)
    }

    fn detach_overlay(&self, map: &mut ScriptMap, overlay: OverlayId) {
        map.commands.push(MapCommand::RemoveOverlay { id: overlay.0 });
    }

    fn fit_bounds(&self, map: &mut ScriptMap, bounds: &Bounds) {
        if let (Some(sw), Some(ne)) = (bounds.south_west(), bounds.north_east()) {
            map.commands.push(MapCommand::SetBounds { sw, ne });
        }
    }
}

/// Fetches the Kakao Maps SDK script over HTTP.
pub struct KakaoScript {
    client: reqwest::Client,
    url: String,
}

impl KakaoScript {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ScriptSource for KakaoScript {
    type Sdk = KakaoSdk;

    async fn load(&self) -> MapResult<KakaoSdk> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MapError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MapError::Status(response.status().as_u16()));
        }

        let script = response
            .text()
            .await
            .map_err(|e| MapError::Request(e.to_string()))?;

        if script.trim().is_empty() {
            return Err(MapError::EmptyScript);
        }

        tracing::info!(bytes = script.len(), "Map SDK script loaded");

        Ok(KakaoSdk::new(script))
    }
}
