use clap::Args;
use focusdeck_core::{
    Clock, Config, Dashboard, FocusTimer, HabitBook, NoteBook, SystemClock, TaskList, WeekStart,
};

use super::{open_store, print_json, CmdResult};

#[derive(Args)]
pub struct DashboardArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: DashboardArgs) -> CmdResult {
    let config = Config::load_or_default();
    let store = open_store()?;
    let clock = SystemClock;
    let today = clock.today();

    let tasks = TaskList::load(&store);
    let notes = NoteBook::load(&store);
    let habits = HabitBook::load(&store);
    let cycles = FocusTimer::load(&store, &clock, config.default_durations()).cycles_today()?;

    let dashboard = Dashboard::collect(
        tasks.all(),
        notes.all(),
        habits.list(),
        cycles,
        today,
        WeekStart::from_config(config.habits.week_starts_on_monday),
    );

    if args.json {
        return print_json(&dashboard);
    }
    println!("Dashboard for {}", dashboard.date);
    println!("  Tasks due today:           {}", dashboard.tasks_due_today);
    println!("  Tasks completed this week: {}", dashboard.tasks_completed_this_week);
    println!("  Focus sessions today:      {}", dashboard.focus_cycles_today);
    println!("  Habits marked today:       {}", dashboard.habits_marked_today);
    println!("  Total notes:               {}", dashboard.total_notes);
    Ok(())
}
