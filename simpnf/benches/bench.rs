use criterion::{criterion_group, criterion_main, Criterion};
use simpnf::{Config, Env, Error, Linter, RuleDatabase, Symbol};

const NAT: &str = include_str!("nat.dk");

fn load(cmds: &str) -> Env {
    let mut env = Env::new();
    env.load(cmds).unwrap();
    env
}

fn lint(env: &Env, db: &RuleDatabase, cfg: &Config) -> Result<usize, Error> {
    let linter = Linter::new(env, db, cfg);
    let mut reports = 0;
    for decl in env.decls() {
        for report in [linter.normal_form(&decl.name)?, linter.var_head(&decl.name)?, linter.comm(&decl.name)?] {
            reports += report.is_some() as usize
        }
    }
    Ok(reports)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let cfg = Config::default();
    let env = load(NAT);
    let db = RuleDatabase::from_env(&env, &cfg).unwrap();

    c.bench_function("load", |b| b.iter(|| load(NAT)));
    c.bench_function("db", |b| b.iter(|| RuleDatabase::from_env(&env, &cfg).unwrap()));
    c.bench_function("lint", |b| b.iter(|| lint(&env, &db, &cfg).unwrap()));

    let linter = Linter::new(&env, &db, &cfg);
    let len_app = Symbol::new("len_app");
    c.bench_function("normal_form", |b| b.iter(|| linter.normal_form(&len_app).unwrap()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
