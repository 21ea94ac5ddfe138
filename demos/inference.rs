//! Provides an example of how to use jointly to compute exact beliefs on a Markov network.
//!
//! The network is the Misconception example of Koller & Friedman Section 4.1: four students
//! studying in pairs, where A and C (and B and D) never talk to each other.

extern crate jointly;
#[macro_use]
extern crate ndarray;

use jointly as j;
use j::InferenceAlgorithm;

fn main() -> j::Result<()> {
    tracing_subscriber::fmt().init();

    let alice = j::Variable::binary(0);
    let bob = j::Variable::binary(1);
    let charles = j::Variable::binary(2);
    let debbie = j::Variable::binary(3);

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let ab = j::Factor::from_table(vec![alice, bob], array![[30., 5.], [1., 10.]].into_dyn())?;
    let bc = j::Factor::from_table(vec![bob, charles], array![[100., 1.], [1., 100.]].into_dyn())?;
    let cd = j::Factor::from_table(vec![charles, debbie], array![[1., 100.], [100., 1.]].into_dyn())?;
    let da = j::Factor::from_table(vec![debbie, alice], array![[100., 1.], [1., 100.]].into_dyn())?;

    let model = j::FactorGraphBuilder::new()
        .with_named_variable(&alice, "Alice")
        .with_named_variable(&bob, "Bob")
        .with_named_variable(&charles, "Charles")
        .with_named_variable(&debbie, "Debbie")
        .with_factor(ab.scope().clone(), j::Initialization::Table(ab))
        .with_factor(bc.scope().clone(), j::Initialization::Table(bc))
        .with_factor(cd.scope().clone(), j::Initialization::Table(cd))
        .with_factor(da.scope().clone(), j::Initialization::Table(da))
        .build()?;

    /////////////////////////////////////////////////////
    // Step 2: Build an inference engine
    let mut opts = j::PropertySet::new();
    opts.insert(String::from("verbose"), String::from("1"));
    let mut engine = j::ExactInf::new(&model, &opts)?;
    engine.init();

    /////////////////////////////////////////////////////
    // Step 3: Run
    engine.run()?;

    println!("{}: log Z = {:.6} (Z = {:.0})", engine.identify(), engine.log_z(), engine.log_z().exp());

    for var in model.variables() {
        let belief = engine.belief(var)?;
        let name = model.lookup_name(var).cloned().unwrap_or_else(|| var.to_string());
        for (state, p) in belief.values().iter().enumerate() {
            println!("P({} = {}) = {:.4}", name, state, p);
        }
    }

    let pair = j::VarSet::from_vars(&[alice, bob]);
    let belief = engine.belief_scope(&pair)?;
    for (i, assignment) in j::all_assignments(&pair).enumerate() {
        println!(
            "P(Alice = {}, Bob = {}) = {:.4}",
            assignment.get(&alice).cloned().unwrap_or(0),
            assignment.get(&bob).cloned().unwrap_or(0),
            belief.get(i).unwrap_or(std::f64::NAN)
        );
    }

    Ok(())
}
