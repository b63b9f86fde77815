use bindery::helpers::{
    register, register_auto_factory, register_constant_value, register_dynamic_value,
    register_self,
};
use bindery::{injectable, injections, AutoFactory, Class, Container, Error, Injection, Shared};
use tracing::info;

trait Weapon {
    fn name(&self) -> &'static str;
}

struct Katana;
struct Shuriken;

impl Weapon for Katana {
    fn name(&self) -> &'static str {
        "Katana"
    }
}

impl Weapon for Shuriken {
    fn name(&self) -> &'static str {
        "Shuriken"
    }
}

injectable!(Katana => Katana);
injectable!(Shuriken => Shuriken);

struct Ninja {
    primary: Shared<dyn Weapon>,
    secondary: Shared<dyn Weapon>,
    clan: Shared<String>,
    spare: Shared<AutoFactory<dyn Weapon>>,
}

injectable!(Ninja {
    primary: dyn Weapon,
    secondary: dyn Weapon,
    clan: String,
    spare: AutoFactory<dyn Weapon>,
});

struct Dojo {
    sensei: Shared<Ninja>,
}

injectable!(Dojo { sensei: Ninja });

fn build() -> Result<Container, Error> {
    let container = Container::new();

    let register = register(&container);
    register
        .bind("Weapon")
        .when(|b| {
            b.when_target_tagged("throwable", false);
        })
        .apply(Class::<Katana>::new().upcast(|k| k as Shared<dyn Weapon>))?;
    register
        .bind("Weapon")
        .when(|b| {
            b.in_singleton_scope().when_target_tagged("throwable", true);
        })
        .apply(Class::<Shuriken>::new().upcast(|s| s as Shared<dyn Weapon>))?;

    register_constant_value(&container)
        .bind("Clan")
        .to(Shared::new(String::from("Iga")))?;

    register_dynamic_value(&container)
        .bind("Spare")
        .to(|_| Ok(Shared::new(Katana) as Shared<dyn Weapon>))?;

    register_auto_factory(&container)
        .bind("Factory<Weapon>")
        .to::<dyn Weapon>("Spare")?;

    register
        .bind("Ninja")
        .inject(injections![
            Injection::tagged("Weapon", "throwable", false),
            Injection::tagged("Weapon", "throwable", true),
            "Clan",
            "Factory<Weapon>",
        ])
        .apply(Class::<Ninja>::new())?;

    register_self(&container)
        .bind()
        .inject(["Ninja"])
        .when(|b| {
            b.in_singleton_scope();
        })
        .apply(Class::<Dojo>::new())?;

    Ok(container)
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let container = build().expect("Failed to wire container");
    info!("Container ready: {:?}", container);

    let ninja = container.get::<Ninja>("Ninja");
    info!(
        "Ninja of clan {} wields {} and {}",
        ninja.clan,
        ninja.primary.name(),
        ninja.secondary.name()
    );

    match ninja.spare.create() {
        Ok(spare) => info!("Spare weapon: {}", spare.name()),
        Err(err) => info!("No spare weapon: {}", err),
    }

    let dojo = container.get::<Dojo>(Class::<Dojo>::new().id());
    let again = container.get::<Dojo>(Class::<Dojo>::new().id());
    info!(
        "Dojo sensei wields {}; same dojo on second lookup: {}",
        dojo.sensei.primary.name(),
        Shared::ptr_eq(&dojo, &again)
    );

    if let Err(err) = container.try_get_named::<dyn Weapon>("Weapon", "missing") {
        info!("Expected failure: {}", err);
    }
}
