use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use futures::StreamExt as _;
use knob::{
    Action, CancellationToken, Entity, Observer, Property,
    common::{
        Mapper as _,
        mappers::{EnumMapper, Multiplier, NumberValidate, NumberValidateOptions},
    },
    debounce,
};
use tokio::sync::watch;

/// What the device reports: tenths of a degree and a numeric mode code
#[derive(Debug, Clone, Copy)]
struct Registers {
    target: f64,
    mode: u8,
}

fn register<V>(
    tx: &watch::Sender<Registers>,
    get: fn(&Registers) -> V,
    set: fn(&mut Registers, V),
) -> Property<V>
where
    V: Send + Sync + 'static,
{
    let reader = tx.subscribe();
    let writer = tx.clone();

    Property::new()
        .with_read(move |_| {
            let value = get(&reader.borrow());
            async move { Ok(value) }
        })
        .with_write(move |_, value| {
            writer.send_modify(|registers| set(registers, value));
            async { Ok(()) }
        })
        .with_observe(Observer::from_watch(tx.subscribe()).map(move |registers| Ok(get(&registers))))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> knob::Result<()> {
    knob::log::init();

    let (tx, _rx) = watch::channel(Registers { target: 180.0, mode: 0 });

    let target = register(&tx, |r| r.target, |r, v| r.target = v).map(Multiplier::new(0.1).then(
        NumberValidate::new(NumberValidateOptions {
            min: Some(5.0),
            max: Some(30.0),
            step: Some(0.5),
            nan: false,
        })?,
    ));
    let mode = register(&tx, |r| r.mode, |r, v| r.mode = v)
        .map(EnumMapper::new([("off", 0), ("heat", 1), ("cool", 2)])?);

    let applied = Arc::new(AtomicUsize::new(0));
    let apply = debounce(
        Action::new({
            let applied = applied.clone();
            let tx = tx.clone();
            move |(), _| {
                applied.fetch_add(1, Ordering::SeqCst);
                let registers = *tx.borrow();
                async move {
                    tracing::info!(?registers, "pushing settings to the device");
                    Ok(())
                }
            }
        }),
        Duration::from_millis(250),
    );

    let thermostat = Entity::builder("hallway.thermostat")
        .property("target", target)
        .property("mode", mode)
        .action("apply", apply)
        .build()?;

    let target = thermostat.property::<f64>("target").expect("target is registered");
    let mode = thermostat.property::<&'static str>("mode").expect("mode is registered");
    let apply = thermostat.action::<(), ()>("apply").expect("apply is registered");

    let signal = CancellationToken::new();
    let mut changes = target.observer().open(&signal);
    let first = changes.next().await;
    tracing::info!(setpoint = ?first, "observing target");

    target.set(21.5, None).await?;
    mode.set("heat", None).await?;
    let (setpoint, current_mode) = (target.get(None).await?, mode.get(None).await?);
    tracing::info!(setpoint, mode = current_mode, "updated");

    let changed = changes.next().await;
    tracing::info!(setpoint = ?changed, "target changed");

    if let Err(e) = target.set(21.3, None).await {
        tracing::warn!(error = %e, "rejected");
    }
    if let Err(e) = mode.set("dry", None).await {
        tracing::warn!(error = %e, "rejected");
    }

    let (a, b, c) = tokio::join!(apply.call(None), apply.call(None), apply.call(None));
    a.and(b).and(c)?;
    tracing::info!(sends = applied.load(Ordering::SeqCst), "applied three times");

    signal.cancel();
    let last = changes.next().await;
    tracing::info!(?last, "stopped observing");

    Ok(())
}
