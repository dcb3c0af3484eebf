//! Location content source.
//!
//! The location list normally comes from a headless content API at startup;
//! the viewer ships a built-in default list so it works offline, when no API
//! is configured, and when the fetch fails. A successful non-empty fetch
//! replaces the list exactly once, which respawns the markers and clears any
//! selection so indices never dangle.

use std::future::Future;

use bevy::prelude::*;
use fellowsphere::{Location, LocationSet, Mentor};
use serde::Deserialize;

use crate::launch_params::LaunchParams;
use crate::picking::{GlobeSelection, PointerState};

/// User agent for content API requests.
const USER_AGENT: &str = "fellowsphere-viewer/0.1 (https://github.com/fellowsphere/fellowsphere)";

/// Query for the ordered location list, in the content API's query language.
const LOCATIONS_QUERY: &str = "*[_type == \"location\"] | order(orderRank)";

/// Marker color used when a record carries no color or an invalid one.
pub const DEFAULT_MARKER_COLOR: &str = "#e8604c";

/// Plugin for fetching and holding the location list.
pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        let client = HttpClient(
            reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("failed to create HTTP client"),
        );

        // Native needs a Tokio runtime for reqwest; on WASM the browser's
        // fetch runs on Bevy's task pool.
        #[cfg(not(target_family = "wasm"))]
        app.add_plugins(bevy_tokio_tasks::TokioTasksPlugin::default());

        app.insert_resource(client)
            .insert_resource(Locations(LocationSet::new(default_locations())))
            .init_resource::<ContentState>()
            .add_systems(Startup, start_content_fetch)
            .add_systems(Update, poll_content_results);
    }
}

/// Shared HTTP client for content requests.
#[derive(Resource)]
pub struct HttpClient(reqwest::Client);

/// The session's location list.
///
/// Read-only for the whole session apart from the single replacement when a
/// fetch succeeds.
#[derive(Resource)]
pub struct Locations(pub LocationSet);

impl std::ops::Deref for Locations {
    type Target = LocationSet;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Progress of the startup content fetch, for the UI status line.
#[derive(Resource)]
pub struct ContentState {
    pub is_loading: bool,
    pub error: Option<String>,
    result_rx: async_channel::Receiver<Result<Vec<Location>, String>>,
    result_tx: async_channel::Sender<Result<Vec<Location>, String>>,
}

impl Default for ContentState {
    fn default() -> Self {
        let (result_tx, result_rx) = async_channel::bounded(1);
        Self {
            is_loading: false,
            error: None,
            result_rx,
            result_tx,
        }
    }
}

/// Build the fetch future if a content API is configured, marking the state
/// as loading. The result comes back over the state's channel.
fn prepare_fetch(
    params: &LaunchParams,
    client: &HttpClient,
    state: &mut ContentState,
) -> Option<impl Future<Output = ()> + 'static> {
    let Some(base) = params.content_api.clone() else {
        tracing::info!("no content API configured, using built-in locations");
        return None;
    };

    state.is_loading = true;
    let client = client.0.clone();
    let tx = state.result_tx.clone();

    Some(async move {
        let result = fetch_locations(&client, &base).await;
        let _ = tx.send(result).await;
    })
}

/// Kick off the single background fetch on the Tokio runtime.
#[cfg(not(target_family = "wasm"))]
#[allow(clippy::needless_pass_by_value)]
fn start_content_fetch(
    params: Res<LaunchParams>,
    client: Res<HttpClient>,
    mut state: ResMut<ContentState>,
    runtime: Res<bevy_tokio_tasks::TokioTasksRuntime>,
) {
    if let Some(fetch) = prepare_fetch(&params, &client, &mut state) {
        runtime.spawn_background_task(move |_ctx| fetch);
    }
}

/// Kick off the single background fetch on Bevy's task pool.
///
/// The browser is single-threaded, so `spawn_local` is the right home for
/// reqwest's fetch-backed future.
#[cfg(target_family = "wasm")]
#[allow(clippy::needless_pass_by_value)]
fn start_content_fetch(
    params: Res<LaunchParams>,
    client: Res<HttpClient>,
    mut state: ResMut<ContentState>,
) {
    if let Some(fetch) = prepare_fetch(&params, &client, &mut state) {
        bevy::tasks::AsyncComputeTaskPool::get()
            .spawn_local(fetch)
            .detach();
    }
}

/// Poll for the fetch result and apply it.
///
/// A non-empty fetched list replaces the built-in one; the selection is
/// dismissed and the fallback cursor reset since the old indices no longer
/// mean anything. An empty or failed fetch leaves the default list in place.
#[allow(clippy::needless_pass_by_value)]
fn poll_content_results(
    mut state: ResMut<ContentState>,
    mut locations: ResMut<Locations>,
    mut selection: ResMut<GlobeSelection>,
    mut pointer: ResMut<PointerState>,
) {
    while let Ok(result) = state.result_rx.try_recv() {
        state.is_loading = false;
        match result {
            Ok(fetched) if fetched.is_empty() => {
                tracing::warn!("content API returned no locations, keeping defaults");
                state.error = Some("content API returned no locations".to_string());
            }
            Ok(fetched) => {
                tracing::info!(count = fetched.len(), "loaded locations from content API");
                locations.0 = LocationSet::new(fetched);
                selection.state.dismiss();
                pointer.cycler.reset();
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "content fetch failed, keeping defaults");
                state.error = Some(e);
            }
        }
    }
}

/// Fetch the location list from the content API.
async fn fetch_locations(client: &reqwest::Client, base: &str) -> Result<Vec<Location>, String> {
    let url = format!("{base}?query={}", urlencoding::encode(LOCATIONS_QUERY));

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    let envelope: Envelope = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {e}"))?;

    Ok(envelope.result.into_iter().map(Location::from).collect())
}

/// Response envelope from the content API.
#[derive(Debug, Deserialize)]
struct Envelope {
    result: Vec<LocationRecord>,
}

/// One location document as served by the content API.
#[derive(Debug, Deserialize)]
struct LocationRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    country: String,
    lat: f64,
    lng: f64,
    color: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    mentors: Vec<MentorRecord>,
}

#[derive(Debug, Deserialize)]
struct MentorRecord {
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    expertise: Vec<String>,
}

impl From<LocationRecord> for Location {
    fn from(record: LocationRecord) -> Self {
        let color = match record.color {
            Some(color) if is_hex_color(&color) => color,
            Some(color) => {
                tracing::warn!(id = %record.id, color = %color, "invalid marker color, using default");
                DEFAULT_MARKER_COLOR.to_string()
            }
            None => DEFAULT_MARKER_COLOR.to_string(),
        };

        Location {
            id: record.id,
            name: record.name,
            country: record.country,
            latitude: record.lat,
            longitude: record.lng,
            color,
            description: record.description,
            mentors: record.mentors.into_iter().map(Mentor::from).collect(),
        }
    }
}

impl From<MentorRecord> for Mentor {
    fn from(record: MentorRecord) -> Self {
        Mentor {
            name: record.name,
            title: record.title,
            bio: record.bio,
            expertise: record.expertise,
        }
    }
}

/// Whether a string is a `#rrggbb` hex color.
fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// The built-in fellowship training locations.
///
/// Shown when no content API is configured and kept when the fetch fails.
pub fn default_locations() -> Vec<Location> {
    fn mentor(name: &str, title: &str, bio: &str, expertise: &[&str]) -> Mentor {
        Mentor {
            name: name.to_string(),
            title: title.to_string(),
            bio: bio.to_string(),
            expertise: expertise.iter().map(ToString::to_string).collect(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn location(
        id: &str,
        name: &str,
        country: &str,
        latitude: f64,
        longitude: f64,
        color: &str,
        description: &str,
        mentors: Vec<Mentor>,
    ) -> Location {
        Location {
            id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            latitude,
            longitude,
            color: color.to_string(),
            description: description.to_string(),
            mentors,
        }
    }

    vec![
        location(
            "exeter",
            "Exeter",
            "United Kingdom",
            50.7184,
            -3.5339,
            "#e8604c",
            "Hip and knee arthroplasty fellowship at the Princess Elizabeth \
             Orthopaedic Centre.",
            vec![
                mentor(
                    "Prof. Jonathan Howell",
                    "Consultant Orthopaedic Surgeon",
                    "Leads the Exeter hip unit with a focus on cemented stem \
                     design and revision arthroplasty.",
                    &["Hip arthroplasty", "Revision surgery"],
                ),
                mentor(
                    "Mr. Matthew Hubble",
                    "Consultant Orthopaedic Surgeon",
                    "Specialist in complex primary and revision hip \
                     replacement.",
                    &["Hip arthroplasty", "Bone grafting"],
                ),
            ],
        ),
        location(
            "sydney",
            "Sydney",
            "Australia",
            -33.8688,
            151.2093,
            "#4c9be8",
            "Sports knee and shoulder fellowship across the North Shore \
             campuses.",
            vec![mentor(
                "Prof. David Parker",
                "Orthopaedic Knee Surgeon",
                "Internationally recognised for ligament reconstruction and \
                 osteotomy around the knee.",
                &["Knee reconstruction", "Sports injuries", "Osteotomy"],
            )],
        ),
        location(
            "toronto",
            "Toronto",
            "Canada",
            43.6532,
            -79.3832,
            "#58b368",
            "Trauma and upper-limb fellowship at the university teaching \
             hospitals.",
            vec![mentor(
                "Dr. Michael McKee",
                "Professor of Orthopaedic Surgery",
                "Authority on fracture fixation of the shoulder girdle and \
                 elbow.",
                &["Orthopaedic trauma", "Shoulder surgery", "Elbow surgery"],
            )],
        ),
        location(
            "bern",
            "Bern",
            "Switzerland",
            46.9480,
            7.4474,
            "#d4a53f",
            "Hip preservation fellowship at the Inselspital.",
            vec![mentor(
                "Prof. Klaus Siebenrock",
                "Chair of Orthopaedic Surgery",
                "Pioneer of periacetabular osteotomy and femoroacetabular \
                 impingement surgery.",
                &["Hip preservation", "Osteotomy"],
            )],
        ),
        location(
            "seoul",
            "Seoul",
            "South Korea",
            37.5665,
            126.9780,
            "#b06ae0",
            "High-volume knee arthroplasty fellowship.",
            vec![mentor(
                "Prof. Chong Bum Chang",
                "Professor of Orthopaedic Surgery",
                "Focus on alignment philosophy and outcomes in total knee \
                 replacement.",
                &["Knee arthroplasty", "Alignment analysis"],
            )],
        ),
        location(
            "baltimore",
            "Baltimore",
            "United States",
            39.2904,
            -76.6122,
            "#e0576f",
            "Limb lengthening and deformity correction fellowship.",
            vec![mentor(
                "Dr. Janet Conway",
                "Head of Bone and Joint Infection",
                "Specialist in limb reconstruction and management of \
                 infected nonunion.",
                &["Limb reconstruction", "Bone infection"],
            )],
        ),
        location(
            "auckland",
            "Auckland",
            "New Zealand",
            -36.8509,
            174.7645,
            "#47b8b2",
            "Foot and ankle fellowship across public and private units.",
            vec![mentor(
                "Mr. Matthew Tomlinson",
                "Consultant Orthopaedic Surgeon",
                "Leads the national foot and ankle training rotation.",
                &["Foot and ankle", "Ankle arthroplasty"],
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_fetch_noop_without_content_api() {
        let params = LaunchParams::default();
        let client = HttpClient(reqwest::Client::new());
        let mut state = ContentState::default();

        assert!(prepare_fetch(&params, &client, &mut state).is_none());
        assert!(!state.is_loading);
    }

    #[test]
    fn test_prepare_fetch_marks_loading_when_configured() {
        let params = LaunchParams {
            content_api: Some("http://localhost:3333/api/query".to_string()),
            rotate_speed: 0.1,
        };
        let client = HttpClient(reqwest::Client::new());
        let mut state = ContentState::default();

        // Building the future does not run it; the fetch only happens once
        // it is spawned on the platform runtime.
        assert!(prepare_fetch(&params, &client, &mut state).is_some());
        assert!(state.is_loading);
    }

    #[test]
    fn test_default_list_has_seven_valid_locations() {
        let locations = default_locations();
        assert_eq!(locations.len(), 7);
        for location in &locations {
            assert!(!location.id.is_empty());
            assert!(!location.name.is_empty());
            assert!((-90.0..=90.0).contains(&location.latitude), "{}", location.name);
            assert!(
                (-180.0..=180.0).contains(&location.longitude),
                "{}",
                location.name
            );
            assert!(is_hex_color(&location.color), "{}", location.name);
            assert!(!location.mentors.is_empty(), "{}", location.name);
        }
    }

    #[test]
    fn test_default_list_names_are_unique() {
        let locations = default_locations();
        let mut names: Vec<_> = locations.iter().map(|l| l.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), locations.len());
    }

    #[test]
    fn test_envelope_parses_and_converts() {
        let json = r##"{
            "result": [{
                "_id": "loc-1",
                "name": "Exeter",
                "country": "United Kingdom",
                "lat": 50.7184,
                "lng": -3.5339,
                "color": "#aabbcc",
                "description": "Hip fellowship.",
                "mentors": [{
                    "name": "Prof. Example",
                    "title": "Consultant",
                    "expertise": ["Hip arthroplasty"]
                }]
            }]
        }"##;

        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.result.len(), 1);

        let location = Location::from(envelope.result.into_iter().next().unwrap());
        assert_eq!(location.id, "loc-1");
        assert_eq!(location.color, "#aabbcc");
        assert_eq!(location.mentors.len(), 1);
        assert_eq!(location.mentors[0].name, "Prof. Example");
        // Missing bio defaults to empty.
        assert!(location.mentors[0].bio.is_empty());
    }

    #[test]
    fn test_sparse_record_parses() {
        let json = r#"{"result": [{"_id": "x", "name": "Somewhere", "lat": 1.0, "lng": 2.0}]}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        let location = Location::from(envelope.result.into_iter().next().unwrap());
        assert_eq!(location.color, DEFAULT_MARKER_COLOR);
        assert!(location.country.is_empty());
        assert!(location.mentors.is_empty());
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let record = LocationRecord {
            id: "x".to_string(),
            name: "Somewhere".to_string(),
            country: String::new(),
            lat: 0.0,
            lng: 0.0,
            color: Some("tomato".to_string()),
            description: String::new(),
            mentors: Vec::new(),
        };
        assert_eq!(Location::from(record).color, DEFAULT_MARKER_COLOR);
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#e8604c"));
        assert!(is_hex_color("#ABCDEF"));
        assert!(!is_hex_color("e8604c"));
        assert!(!is_hex_color("#e8604"));
        assert!(!is_hex_color("#e8604cz"));
        assert!(!is_hex_color("#e8604g"));
    }
}
