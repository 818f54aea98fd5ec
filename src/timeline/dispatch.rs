//! One command → renderer calls.

use crate::geo::GeoResolver;
use crate::model::{Config, LngLat};
use crate::processor::ast::{Command, Direction, Endpoint, Legend, RemoveScope, Script};
use crate::processor::legend;
use crate::render::{
    Anchor, ArrowLabels, ArrowStyle, CameraShot, FillStyle, MarkerSpec, Renderer,
};

/// Range the symbol scale of an effect marker is clamped to.
const SYMBOL_SCALE: (f64, f64) = (0.5, 3.0);

/// Read-only inputs of a dispatch.
pub(crate) struct Context<'a, G> {
    pub resolver: &'a G,
    pub config: &'a Config,
    /// Whole loaded script, for `legend: auto`.
    pub script: &'a Script,
}

/// Apply `cmd` to `renderer`.
///
/// `Err` carries the reason a command had no visual effect. It is never
/// fatal; the caller reports it and moves on.
pub(crate) fn dispatch<R, G>(cmd: &Command, renderer: &mut R, ctx: &Context<'_, G>) -> Result<(), String>
where
    R: Renderer,
    G: GeoResolver,
{
    let color = |token: &str| ctx.config.resolve_color(Some(token));

    match cmd {
        Command::Country {
            name,
            color: token,
            animation,
        } => {
            let territory = ctx
                .resolver
                .find_territory(name)
                .ok_or_else(|| format!("unknown territory \"{name}\""))?;
            renderer.draw_territory(territory, &color(token), FillStyle::Solid(*animation));
        }

        Command::Region {
            name,
            country,
            color: token,
            animation,
            occupied,
        } => {
            let territory = ctx
                .resolver
                .find_subregion(name, country)
                .ok_or_else(|| format!("unknown region \"{name}\" in \"{country}\""))?;
            let fill = if *occupied {
                FillStyle::Occupied
            } else {
                FillStyle::Solid(*animation)
            };
            renderer.draw_territory(territory, &color(token), fill);
        }

        Command::Line {
            from,
            to,
            color: token,
        } => {
            if let (Endpoint::Territory(a), Endpoint::Territory(b)) = (from, to) {
                if let (Some(a), Some(b)) =
                    (ctx.resolver.find_territory(a), ctx.resolver.find_territory(b))
                {
                    renderer.draw_connector(a, b, &color(token));
                    return Ok(());
                }
            }
            let (from, _) = endpoint(from, ctx.resolver)?;
            let (to, _) = endpoint(to, ctx.resolver)?;
            renderer.draw_arrow(from, to, &color(token), ArrowStyle::PLAIN_LINE, None);
        }

        Command::Attack {
            from,
            to,
            color: token,
            curve,
            width,
            head_size,
        } => {
            let (from, from_label) = endpoint(from, ctx.resolver)?;
            let (to, to_label) = endpoint(to, ctx.resolver)?;
            let style = ArrowStyle {
                curve: *curve,
                width: *width,
                head_size: *head_size,
            };
            let labels = ArrowLabels {
                from: from_label,
                to: to_label,
            };
            renderer.draw_arrow(from, to, &color(token), style, Some(labels));
        }

        Command::Bubble {
            lat,
            lng,
            text,
            color: token,
        } => {
            let spec = MarkerSpec::Bubble {
                text: text.clone(),
                color: color(token),
            };
            renderer.place_marker(spec, LngLat::new(*lng, *lat), Anchor::Center);
        }

        Command::Label {
            lat,
            lng,
            text,
            size,
            color: token,
        } => {
            let spec = MarkerSpec::Label {
                text: text.clone(),
                size: *size,
                color: ctx.config.resolve_color(token.as_deref()),
            };
            renderer.place_marker(spec, LngLat::new(*lng, *lat), Anchor::Center);
        }

        Command::Arrow {
            lat,
            lng,
            text,
            direction,
            color: token,
        } => {
            // The callout body sits on the side it points away from.
            let anchor = match direction {
                Direction::Left => Anchor::Right,
                Direction::Right => Anchor::Left,
            };
            let spec = MarkerSpec::Callout {
                text: text.clone(),
                direction: *direction,
                color: color(token),
            };
            renderer.place_marker(spec, LngLat::new(*lng, *lat), anchor);
        }

        Command::Year { text, highlight } => renderer.show_year(text, *highlight),

        Command::Effect {
            lat,
            lng,
            effect_name,
            color: token,
            size,
        } => {
            let def = ctx
                .config
                .effect(effect_name)
                .ok_or_else(|| format!("unknown effect \"{effect_name}\""))?;
            let spec = MarkerSpec::Symbol {
                effect: effect_name.clone(),
                label: def.label.clone(),
                color: color(token),
                scale: size.clamp(SYMBOL_SCALE.0, SYMBOL_SCALE.1),
            };
            renderer.place_marker(spec, LngLat::new(*lng, *lat), Anchor::Center);
        }

        Command::Legend(Legend::Entry {
            label,
            color: token,
        }) => renderer.add_legend_entry(label, &color(token)),
        Command::Legend(Legend::Auto) => {
            renderer.show_auto_legend(&legend::auto_entries(ctx.script, ctx.config))
        }
        Command::Legend(Legend::Hide) => renderer.hide_legend(),

        Command::Zoom { target } => {
            let territory = ctx
                .resolver
                .find_territory(target)
                .ok_or_else(|| format!("unknown territory \"{target}\""))?;
            renderer.pan_to_bounds(ctx.resolver.bounding_box(territory));
        }

        Command::Fly { lat, lng, zoom } => renderer.pan_to(*lat, *lng, *zoom),

        Command::Cinematic {
            lat,
            lng,
            zoom,
            pitch,
            bearing,
        } => renderer.cinematic_pan_to(CameraShot {
            lat: *lat,
            lng: *lng,
            zoom: *zoom,
            pitch: pitch.unwrap_or(ctx.config.cinematic.pitch),
            bearing: bearing.unwrap_or(ctx.config.cinematic.bearing),
        }),

        Command::Wait { .. } => {}

        Command::Remove { scope } => match scope {
            RemoveScope::Last => renderer.remove_last_marker(),
            RemoveScope::Arrows => renderer.clear_connectors(),
            RemoveScope::Effects => renderer.clear_symbol_markers(),
        },
    }

    Ok(())
}

/// Point and display label of a `line:`/`attack:` endpoint.
fn endpoint<G: GeoResolver>(ep: &Endpoint, resolver: &G) -> Result<(LngLat, String), String> {
    match ep {
        Endpoint::Coordinates { lat, lng } => Ok((LngLat::new(*lng, *lat), ep.to_string())),
        Endpoint::Territory(name) => resolver
            .find_territory(name)
            .map(|t| (resolver.representative_point(t), name.clone()))
            .ok_or_else(|| format!("unknown territory \"{name}\"")),
    }
}
