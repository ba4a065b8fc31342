use starscape::{
    data_structures::model::Channel,
    resources::{AssetState, TextureRequest, TextureTarget},
};

#[test]
fn assets_start_pending() {
    let state: AssetState<u32> = AssetState::default();
    assert!(state.is_pending());
    assert_eq!(state.get(), None);
}

#[test]
fn successful_load_becomes_ready() {
    let mut state: AssetState<&str> = AssetState::Pending;
    state.settle::<anyhow::Error>(Ok("moon"));
    assert!(state.is_ready());
    assert_eq!(state.get(), Some(&"moon"));
}

#[test]
fn failed_load_keeps_nothing() {
    let mut state: AssetState<&str> = AssetState::Pending;
    state.settle(Err(anyhow::anyhow!("404")));
    assert!(state.is_failed());
    assert!(!state.is_ready());
    assert_eq!(state.get(), None);
}

#[test]
fn only_normal_channel_requests_are_normal_maps() {
    let diffuse = TextureRequest {
        target: TextureTarget::Material {
            node: 2,
            channel: Channel::Diffuse,
        },
        path: "moon.jpg".to_string(),
    };
    let normal = TextureRequest {
        target: TextureTarget::Material {
            node: 2,
            channel: Channel::Normal,
        },
        path: "bumpy.jpg".to_string(),
    };
    let background = TextureRequest {
        target: TextureTarget::Background,
        path: "space.jpg".to_string(),
    };
    assert!(!diffuse.is_normal_map());
    assert!(normal.is_normal_map());
    assert!(!background.is_normal_map());
}

#[test]
fn missing_file_fails_to_load() {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let loaded = runtime.block_on(starscape::resources::load_binary("no-such-texture.png"));
    assert!(loaded.is_err());
}
