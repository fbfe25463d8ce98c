/// Tests for RenderTarget

use super::*;
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::{
    blit_count, clear_commands, commands, count_commands, mipmap_count, mock_context, CommandLog,
    MockCommand, MockGraphicsDevice, MockTexture,
};
use crate::graphics_device::{FramebufferStatus, TextureDesc, TextureType};
use std::sync::Mutex;

// ============================================================================
// Helpers
// ============================================================================

fn setup() -> (Arc<Context>, Arc<Mutex<MockGraphicsDevice>>, CommandLog) {
    mock_context(MockGraphicsDevice::new())
}

fn texture(id: u32, format: TextureFormat, texture_type: TextureType, samples: u32) -> Arc<dyn Texture> {
    let mut desc = TextureDesc::new_2d(64, 64, format);
    desc.texture_type = texture_type;
    desc.samples = samples;
    if texture_type == TextureType::Tex3D {
        desc.depth = 4;
    }
    Arc::new(MockTexture::new(id, desc))
}

fn color(id: u32, samples: u32) -> Arc<dyn Texture> {
    texture(id, TextureFormat::R8G8B8A8_UNORM, TextureType::Tex2D, samples)
}

/// Target with one 4x multisample color texture and nothing else
fn multisample_target(context: &Arc<Context>) -> RenderTarget {
    let format = FboFormat::new()
        .disable_depth()
        .attach(AttachmentPoint::Color(0), color(500, 4), None);
    RenderTarget::create(context.clone(), 64, 64, format).unwrap()
}

fn expect_invalid_specification(result: Result<RenderTarget>) -> String {
    match result {
        Err(Error::InvalidSpecification(message)) => message,
        Err(other) => panic!("expected InvalidSpecification, got {:?}", other),
        Ok(_) => panic!("expected InvalidSpecification, got a render target"),
    }
}

// ============================================================================
// Tests: construction
// ============================================================================

#[test]
fn test_create_default() {
    let (context, _device, _log) = setup();
    let target = RenderTarget::create(context, 64, 64, FboFormat::new()).unwrap();

    assert_eq!(target.size(), (64, 64));
    assert_eq!(target.bounds(), Area::new(0, 0, 64, 64));
    assert_eq!(target.attachments().len(), 2);
    assert!(target.attachments().contains(AttachmentPoint::Color(0)));
    assert!(target.attachments().contains(AttachmentPoint::Depth));
    assert_eq!(target.format().sample_count(), 0);
    assert!(target.has_depth_attachment());
    assert!(!target.has_stencil_attachment());
    assert_eq!(target.effective_size(), (64, 64));
    assert_eq!(target.max_color_attachments().unwrap(), 8);
    assert_eq!(target.max_samples().unwrap(), 8);
    assert_eq!(target.multisample_id(), None);
    assert_eq!(target.id(), target.resolve_id());
    assert!(target.attachments().get(AttachmentPoint::Depth).unwrap().resolve().is_none());
}

#[test]
fn test_single_sample_default_stays_on_primary() {
    let (context, _device, log) = setup();
    let mut target = RenderTarget::create(context.clone(), 64, 64, FboFormat::new()).unwrap();
    let primary = target.resolve_id();

    let color_id = target.attachments().get(AttachmentPoint::Color(0)).unwrap().storage().id();
    assert!(commands(&log).iter().any(|c| matches!(c,
        MockCommand::AttachTexture { framebuffer, point: AttachmentPoint::Color(0), texture, .. }
            if *framebuffer == primary && *texture == color_id)));
    assert!(commands(&log).contains(&MockCommand::SetDrawBuffers {
        framebuffer: primary,
        points: vec![AttachmentPoint::Color(0)],
    }));
    clear_commands(&log);

    target.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();
    assert!(target.depth_texture().unwrap().is_none());
    assert!(target.color_texture(0).unwrap().is_some());

    target.bind(FramebufferKind::Read).unwrap();
    assert_eq!(context.bound_framebuffer(FramebufferKind::Read).unwrap(), Some(primary));
    RenderTarget::unbind(&context).unwrap();

    assert_eq!(blit_count(&log), 0);
}

#[test]
fn test_create_rejects_zero_size() {
    let (context, _device, _log) = setup();
    let message = expect_invalid_specification(RenderTarget::create(context, 0, 64, FboFormat::new()));
    assert!(message.contains("non-zero"));
}

#[test]
fn test_create_simple_combines_depth_and_stencil() {
    let (context, _device, _log) = setup();
    let target = RenderTarget::create_simple(context, 32, 16, false, true, true).unwrap();

    let color = target.attachments().get(AttachmentPoint::Color(0)).unwrap();
    assert_eq!(color.storage().format(), TextureFormat::R8G8B8_UNORM);
    assert!(target.attachments().contains(AttachmentPoint::DepthStencil));
    assert!(!target.attachments().contains(AttachmentPoint::Depth));
    assert!(target.has_depth_attachment());
    assert!(target.has_stencil_attachment());
}

#[test]
fn test_ids_with_resolving_attachment() {
    let (context, _device, _log) = setup();
    let target = multisample_target(&context);

    let shadow = target.multisample_id().unwrap();
    assert_eq!(target.id(), shadow);
    assert_ne!(target.resolve_id(), shadow);
}

#[test]
fn test_ids_without_resolve() {
    let (context, _device, _log) = setup();
    let format = FboFormat::new().disable_depth();
    let target = RenderTarget::create(context, 64, 64, format).unwrap();

    assert_eq!(target.multisample_id(), None);
    assert_eq!(target.id(), target.resolve_id());
}

#[test]
fn test_targets_sharing_context_share_limit_cache() {
    let (context, _device, log) = setup();
    let targets: Vec<RenderTarget> = (0..3)
        .map(|_| RenderTarget::create(context.clone(), 64, 64, FboFormat::new().samples(4)).unwrap())
        .collect();
    for target in &targets {
        assert_eq!(target.max_color_attachments().unwrap(), 8);
        assert_eq!(target.max_samples().unwrap(), 8);
    }

    let queries = count_commands(&log, |c| matches!(c, MockCommand::QueryLimit { .. }));
    assert_eq!(queries, 2);
}

#[test]
fn test_incomplete_framebuffer_fails_and_releases() {
    let (context, device, log) = setup();
    device.lock().unwrap().status = FramebufferStatus::IncompleteMultisample;

    let message = expect_invalid_specification(RenderTarget::create(context, 64, 64, FboFormat::new()));
    assert!(message.contains("multisample"));

    let created = count_commands(&log, |c| matches!(c, MockCommand::CreateFramebuffer { .. }));
    let released = count_commands(&log, |c| matches!(c, MockCommand::ReleaseFramebuffer { .. }));
    assert!(created > 0);
    assert_eq!(created, released);
}

#[test]
fn test_allocation_failure_propagates_unchanged() {
    let (context, device, _log) = setup();
    device.lock().unwrap().fail_texture_creation = true;

    let result = RenderTarget::create(context, 64, 64, FboFormat::new());
    assert!(matches!(result, Err(Error::OutOfMemory)));
}

// ============================================================================
// Tests: validation at construction
// ============================================================================

#[test]
fn test_mixed_2d_and_3d_color_rejected() {
    let (context, _device, _log) = setup();
    let format = FboFormat::new()
        .disable_depth()
        .attach(AttachmentPoint::Color(0), color(500, 1), None)
        .attach(AttachmentPoint::Color(1),
            texture(501, TextureFormat::R8G8B8A8_UNORM, TextureType::Tex3D, 1), None);

    expect_invalid_specification(RenderTarget::create(context, 64, 64, format));
}

#[test]
fn test_sample_counts_must_match() {
    let (context, _device, _log) = setup();
    let mismatched = FboFormat::new()
        .disable_depth()
        .attach(AttachmentPoint::Color(0), color(500, 4), None)
        .attach(AttachmentPoint::Color(1), color(501, 2), None);
    let message = expect_invalid_specification(RenderTarget::create(context.clone(), 64, 64, mismatched));
    assert!(message.contains("Sample counts"));

    let matched = FboFormat::new()
        .disable_depth()
        .attach(AttachmentPoint::Color(0), color(510, 4), None)
        .attach(AttachmentPoint::Color(1), color(511, 4), None);
    let target = RenderTarget::create(context, 64, 64, matched).unwrap();
    assert_eq!(target.format().sample_count(), 4);
}

#[test]
fn test_separate_explicit_depth_and_stencil() {
    let (context, _device, _log) = setup();
    let depth = texture(500, TextureFormat::D24_UNORM, TextureType::Tex2D, 1);
    let stencil = texture(501, TextureFormat::S8_UINT, TextureType::Tex2D, 1);

    let independent = FboFormat::new()
        .attach(AttachmentPoint::Depth, depth.clone(), None)
        .attach(AttachmentPoint::Stencil, stencil.clone(), None);
    assert!(RenderTarget::create(context.clone(), 64, 64, independent).is_ok());

    let combined_requested = FboFormat::new()
        .stencil_buffer()
        .attach(AttachmentPoint::Depth, depth, None)
        .attach(AttachmentPoint::Stencil, stencil, None);
    let message = expect_invalid_specification(RenderTarget::create(context, 64, 64, combined_requested));
    assert!(message.contains("combined"));
}

#[test]
fn test_3d_color_rejects_any_depth() {
    let (context, _device, _log) = setup();
    let volume = TextureFormatRequest::new(TextureFormat::R8G8B8A8_UNORM).tex_3d(4);

    let buffer_depth = FboFormat::new().color_texture(volume.clone());
    expect_invalid_specification(RenderTarget::create(context.clone(), 64, 64, buffer_depth));

    let texture_depth = FboFormat::new()
        .color_texture(volume.clone())
        .depth_texture(TextureFormat::D24_UNORM);
    expect_invalid_specification(RenderTarget::create(context.clone(), 64, 64, texture_depth));

    let explicit_depth = FboFormat::new()
        .color_texture(volume)
        .disable_depth()
        .attach(AttachmentPoint::Depth, texture(500, TextureFormat::D24_UNORM, TextureType::Tex2D, 1), None);
    expect_invalid_specification(RenderTarget::create(context, 64, 64, explicit_depth));
}

#[test]
fn test_explicit_attachment_with_wrong_aspect() {
    let (context, _device, _log) = setup();
    let format = FboFormat::new()
        .attach(AttachmentPoint::Color(0), texture(500, TextureFormat::D24_UNORM, TextureType::Tex2D, 1), None);

    let result = RenderTarget::create(context, 64, 64, format);
    assert!(matches!(result, Err(Error::InvalidAttachmentFormat(_))));
}

// ============================================================================
// Tests: lazy resolve and mipmaps
// ============================================================================

#[test]
fn test_lazy_resolve_runs_once() {
    let (context, _device, log) = setup();
    let mut target = multisample_target(&context);
    clear_commands(&log);

    target.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();

    let first = target.sampled_texture(AttachmentPoint::Color(0)).unwrap().unwrap();
    assert_eq!(blit_count(&log), 1);
    let second = target.sampled_texture(AttachmentPoint::Color(0)).unwrap().unwrap();
    assert_eq!(blit_count(&log), 1);

    assert_eq!(first.id(), second.id());
    assert!(!first.info().is_multisample());
}

#[test]
fn test_mipmaps_follow_texture_flag() {
    let (context, _device, log) = setup();
    let plain = FboFormat::new().disable_depth();
    let mut without = RenderTarget::create(context.clone(), 64, 64, plain).unwrap();
    let mipmapped = FboFormat::new()
        .disable_depth()
        .color_texture(TextureFormatRequest::new(TextureFormat::R8G8B8A8_UNORM).mipmap(true));
    let mut with = RenderTarget::create(context.clone(), 64, 64, mipmapped).unwrap();
    clear_commands(&log);

    without.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();
    without.color_texture(0).unwrap();
    assert_eq!(mipmap_count(&log), 0);

    with.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();
    with.color_texture(0).unwrap();
    with.color_texture(0).unwrap();
    assert_eq!(mipmap_count(&log), 1);
}

#[test]
fn test_bind_for_read_resolves_first() {
    let (context, _device, log) = setup();
    let mut target = multisample_target(&context);
    clear_commands(&log);

    target.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();
    target.bind(FramebufferKind::Read).unwrap();

    assert_eq!(blit_count(&log), 1);
    assert_eq!(context.bound_framebuffer(FramebufferKind::Read).unwrap(), Some(target.resolve_id()));
    RenderTarget::unbind(&context).unwrap();
    assert_eq!(context.bound_framebuffer(FramebufferKind::Read).unwrap(), None);
}

#[test]
fn test_manual_resolve_all() {
    let (context, _device, log) = setup();
    let format = FboFormat::new()
        .disable_depth()
        .auto_resolve(false)
        .attach(AttachmentPoint::Color(0), color(500, 4), Some(color(501, 1)));
    let mut target = RenderTarget::create(context.clone(), 64, 64, format).unwrap();
    clear_commands(&log);

    target.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();
    target.color_texture(0).unwrap();
    assert_eq!(blit_count(&log), 0);

    target.resolve_all().unwrap();
    assert_eq!(blit_count(&log), 1);
}

#[test]
fn test_synthesized_resolve_keeps_mipmaps() {
    let (context, _device, log) = setup();
    let mut desc = TextureDesc::new_2d(64, 64, TextureFormat::R8G8B8A8_UNORM);
    desc.samples = 4;
    desc.mipmap = true;
    let format = FboFormat::new()
        .disable_depth()
        .attach(AttachmentPoint::Color(0), Arc::new(MockTexture::new(500, desc)) as Arc<dyn Texture>, None);
    let mut target = RenderTarget::create(context.clone(), 64, 64, format).unwrap();
    let resolve = target.attachments().get(AttachmentPoint::Color(0)).unwrap().resolve().unwrap().clone();
    assert!(resolve.info().mipmap);
    clear_commands(&log);

    target.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();
    target.color_texture(0).unwrap();

    assert_eq!(blit_count(&log), 1);
    assert!(commands(&log).contains(&MockCommand::GenerateMipmaps { texture: resolve.id() }));
}

#[test]
fn test_manual_update_all_mipmaps() {
    let (context, _device, log) = setup();
    let format = FboFormat::new()
        .disable_depth()
        .auto_mipmap(false)
        .color_texture(TextureFormatRequest::new(TextureFormat::R8G8B8A8_UNORM).mipmap(true));
    let mut target = RenderTarget::create(context, 64, 64, format).unwrap();
    clear_commands(&log);

    target.update_all_mipmaps().unwrap();
    assert_eq!(mipmap_count(&log), 1);
}

#[test]
fn test_renderbuffer_without_resolve_has_no_texture() {
    let (context, _device, _log) = setup();
    let format = FboFormat::new()
        .disable_depth()
        .auto_resolve(false)
        .color_buffer(TextureFormat::R8G8B8A8_UNORM);
    let mut target = RenderTarget::create(context, 64, 64, format).unwrap();

    assert!(target.color_texture(0).unwrap().is_none());
    assert!(target.depth_texture().unwrap().is_none());
}

// ============================================================================
// Tests: incremental attach / detach
// ============================================================================

#[test]
fn test_attach_then_read_returns_same_texture() {
    let (context, _device, log) = setup();
    let mut target = RenderTarget::create(context, 64, 64, FboFormat::new()).unwrap();
    clear_commands(&log);

    let attached = color(700, 1);
    target.attach(AttachmentPoint::Color(1), attached.clone(), None).unwrap();
    let sampled = target.color_texture(1).unwrap().unwrap();

    assert!(Arc::ptr_eq(&attached, &sampled));
    assert_eq!(blit_count(&log), 0);
    assert_eq!(target.attachments().draw_order().len(), 2);
}

#[test]
fn test_attach_multisample_gets_resolve() {
    let (context, _device, _log) = setup();
    let format = FboFormat::new().disable_depth();
    let mut target = RenderTarget::create(context, 64, 64, format).unwrap();
    assert_eq!(target.multisample_id(), None);

    target.attach(AttachmentPoint::Color(0), color(700, 4), None).unwrap();

    let attachment = target.attachments().get(AttachmentPoint::Color(0)).unwrap();
    assert!(attachment.resolve().is_some());
    assert!(target.multisample_id().is_some());
}

#[test]
fn test_attach_wrong_aspect_leaves_target_unchanged() {
    let (context, _device, _log) = setup();
    let mut target = RenderTarget::create(context, 64, 64, FboFormat::new()).unwrap();

    let depth = texture(700, TextureFormat::D24_UNORM, TextureType::Tex2D, 1);
    let result = target.attach(AttachmentPoint::Color(1), depth, None);

    assert!(matches!(result, Err(Error::InvalidAttachmentFormat(_))));
    assert!(!target.attachments().contains(AttachmentPoint::Color(1)));
}

#[test]
fn test_attach_revalidates_set() {
    let (context, _device, _log) = setup();
    let mut target = RenderTarget::create(context, 64, 64, FboFormat::new().disable_depth()).unwrap();

    let volume = texture(700, TextureFormat::R8G8B8A8_UNORM, TextureType::Tex3D, 1);
    let result = target.attach(AttachmentPoint::Color(1), volume, None);

    assert!(matches!(result, Err(Error::InvalidSpecification(_))));
    assert_eq!(target.attachments().len(), 1);
}

#[test]
fn test_attach_rolls_back_when_incomplete() {
    let (context, device, _log) = setup();
    let mut target = RenderTarget::create(context, 64, 64, FboFormat::new()).unwrap();
    device.lock().unwrap().status = FramebufferStatus::IncompleteAttachment;

    let result = target.attach(AttachmentPoint::Color(1), color(700, 1), None);
    assert!(matches!(result, Err(Error::InvalidSpecification(_))));
    assert!(!target.attachments().contains(AttachmentPoint::Color(1)));

    device.lock().unwrap().status = FramebufferStatus::Complete;
    assert!(target.check_completeness().is_ok());
    assert_eq!(target.incomplete_reason().unwrap(), None);
}

#[test]
fn test_detach_last_resolve_drops_shadow() {
    let (context, _device, _log) = setup();
    let format = FboFormat::new()
        .attach(AttachmentPoint::Color(0), color(500, 4), None)
        .attach(AttachmentPoint::Color(1), color(501, 4), None);
    let mut target = RenderTarget::create(context, 64, 64, format).unwrap();
    assert!(target.multisample_id().is_some());

    target.detach(AttachmentPoint::Color(1)).unwrap();
    assert!(target.multisample_id().is_some());

    target.detach(AttachmentPoint::Color(0)).unwrap();
    assert!(target.attachments().get(AttachmentPoint::Depth).unwrap().resolve().is_some());
    assert!(target.multisample_id().is_some());

    target.detach(AttachmentPoint::Depth).unwrap();
    assert!(!target.has_depth_attachment());
    assert_eq!(target.multisample_id(), None);
    assert_eq!(target.id(), target.resolve_id());

    // Detaching an empty point is a no-op
    target.detach(AttachmentPoint::Stencil).unwrap();
    assert!(target.attachments().is_empty());
}

// ============================================================================
// Tests: readback
// ============================================================================

#[test]
fn test_read_pixels_clips_and_flips() {
    let (context, _device, log) = setup();
    let mut target = RenderTarget::create(context, 64, 64, FboFormat::new()).unwrap();
    clear_commands(&log);

    let pixels = target.read_pixels(Area::new(-10, -10, 8, 4), AttachmentPoint::Color(0)).unwrap();

    assert_eq!((pixels.width(), pixels.height()), (8, 4));
    assert_eq!(pixels.pixel(0, 0), Some([3, 3, 3, 3]));
    assert_eq!(pixels.pixel(7, 3), Some([0, 0, 0, 0]));

    let expected = MockCommand::ReadPixels {
        framebuffer: target.id(),
        point: AttachmentPoint::Color(0),
        area: Area::new(0, 0, 8, 4),
    };
    assert!(commands(&log).contains(&expected));
}

#[test]
fn test_read_pixels_resolves_once() {
    let (context, _device, log) = setup();
    let mut target = multisample_target(&context);
    target.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();
    clear_commands(&log);

    target.read_pixels(target.bounds(), AttachmentPoint::Color(0)).unwrap();
    assert_eq!(blit_count(&log), 1);
    let read_from_primary = count_commands(&log, |c| matches!(c,
        MockCommand::ReadPixels { framebuffer, .. } if *framebuffer == target.resolve_id()));
    assert_eq!(read_from_primary, 1);

    target.color_texture(0).unwrap();
    assert_eq!(blit_count(&log), 1);
}

#[test]
fn test_read_pixels_outside_bounds_is_empty() {
    let (context, _device, log) = setup();
    let mut target = RenderTarget::create(context, 64, 64, FboFormat::new()).unwrap();
    clear_commands(&log);

    let pixels = target.read_pixels(Area::new(100, 100, 120, 120), AttachmentPoint::Color(0)).unwrap();
    assert!(pixels.bytes().is_empty());
    assert!(commands(&log).is_empty());
}

#[test]
fn test_read_pixels_missing_point() {
    let (context, _device, _log) = setup();
    let mut target = RenderTarget::create(context, 64, 64, FboFormat::new()).unwrap();

    let result = target.read_pixels(target.bounds(), AttachmentPoint::Color(3));
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

// ============================================================================
// Tests: blits
// ============================================================================

#[test]
fn test_blit_to_marks_destination_dirty() {
    let (context, _device, log) = setup();
    let mut source = RenderTarget::create(context.clone(), 64, 64, FboFormat::new()).unwrap();
    let mut destination = multisample_target(&context);
    clear_commands(&log);

    let (src_area, dst_area) = (source.bounds(), destination.bounds());
    source.blit_to(&mut destination, src_area, dst_area, BlitFilter::Linear, BlitMask::COLOR).unwrap();

    match commands(&log).as_slice() {
        [MockCommand::Blit { src, dst, attachment, filter, .. }] => {
            assert_eq!(*src, Some(source.id()));
            assert_eq!(*dst, Some(destination.id()));
            assert_eq!(*attachment, None);
            assert_eq!(*filter, BlitFilter::Linear);
        }
        other => panic!("unexpected commands {:?}", other),
    }

    // The destination's color resolve is now stale
    destination.color_texture(0).unwrap();
    assert_eq!(blit_count(&log), 2);
}

#[test]
fn test_blit_from_multisample_reads_resolved_framebuffer() {
    let (context, _device, log) = setup();
    let mut source = multisample_target(&context);
    source.bind(FramebufferKind::Draw).unwrap();
    RenderTarget::unbind(&context).unwrap();
    clear_commands(&log);

    let scaled = Area::new(0, 0, 128, 128);
    source.blit_to_screen(source.bounds(), scaled, BlitFilter::Linear, BlitMask::COLOR).unwrap();

    let blits: Vec<_> = commands(&log).into_iter()
        .filter_map(|c| match c {
            MockCommand::Blit { src, dst, dst_area, .. } => Some((src, dst, dst_area)),
            _ => None,
        })
        .collect();
    let shadow = source.multisample_id();
    let primary = Some(source.resolve_id());
    assert_eq!(blits, vec![
        (shadow, primary, source.bounds()),
        (primary, None, scaled),
    ]);

    // Already resolved, so the second copy is a single blit
    source.blit_to_screen(source.bounds(), scaled, BlitFilter::Linear, BlitMask::COLOR).unwrap();
    assert_eq!(blit_count(&log), 3);
}

#[test]
fn test_blit_screen_directions() {
    let (context, _device, log) = setup();
    let mut target = RenderTarget::create(context, 64, 64, FboFormat::new()).unwrap();
    clear_commands(&log);

    target.blit_to_screen(target.bounds(), target.bounds(), BlitFilter::Nearest, BlitMask::COLOR).unwrap();
    target.blit_from_screen(target.bounds(), target.bounds(), BlitFilter::Nearest, BlitMask::COLOR).unwrap();

    let blits: Vec<_> = commands(&log).into_iter()
        .filter_map(|c| match c {
            MockCommand::Blit { src, dst, .. } => Some((src, dst)),
            _ => None,
        })
        .collect();
    assert_eq!(blits, vec![(Some(target.id()), None), (None, Some(target.id()))]);
}

// ============================================================================
// Tests: labels and description
// ============================================================================

#[test]
fn test_label_forwarded_to_both_framebuffers() {
    let (context, _device, log) = setup();
    let format = FboFormat::new().samples(4).label("gbuffer");
    let mut target = RenderTarget::create(context, 64, 64, format).unwrap();

    assert_eq!(target.label(), Some("gbuffer"));
    let expected = MockCommand::SetLabel {
        framebuffer: target.multisample_id().unwrap(),
        label: "gbuffer (multisample)".to_string(),
    };
    assert!(commands(&log).contains(&expected));

    target.set_label("lighting").unwrap();
    assert_eq!(target.label(), Some("lighting"));
    let relabel = MockCommand::SetLabel { framebuffer: target.resolve_id(), label: "lighting".to_string() };
    assert!(commands(&log).contains(&relabel));
}

#[test]
fn test_display_lists_attachments() {
    let (context, _device, _log) = setup();
    let target = RenderTarget::create(context.clone(), 64, 32, FboFormat::new().label("scene")).unwrap();
    let text = target.to_string();

    assert!(text.starts_with(&format!("ID: {}", target.resolve_id())));
    assert!(!text.contains("Multisample ID"));
    assert!(multisample_target(&context).to_string().contains("  Multisample ID: "));
    assert!(text.contains("  Label: scene"));
    assert!(text.contains("   Dims: 64 x 32"));
    assert!(text.contains("-Texture Attachment: COLOR0"));
    assert!(text.contains("-Renderbuffer Attachment: DEPTH"));
}
