use crate::models::{DeviceStateTable, HistoryEventTable, Table};

pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(mut tables: Vec<Box<dyn Table>>) -> Self {
        Self::sort_tables(&mut tables);
        Self { tables }
    }

    fn sort_tables(tables: &mut Vec<Box<dyn Table>>) {
        let mut pending = std::mem::take(tables);
        let mut deps_list: Vec<_> = pending.iter().map(|t| t.dependencies()).collect();
        let mut sorted: Vec<Box<dyn Table>> = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let ready: Vec<usize> = deps_list
                .iter()
                .enumerate()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(i, _)| i)
                .collect();

            assert!(
                !ready.is_empty(),
                "Circular dependency detected or unresolved dependencies exist."
            );

            // swap_remove from the back keeps the remaining indices valid
            for &index in ready.iter().rev() {
                sorted.push(pending.swap_remove(index));
                deps_list.swap_remove(index);
            }

            for deps in deps_list.iter_mut() {
                deps.retain(|dep| !sorted.iter().any(|table| table.name() == *dep));
            }
        }

        *tables = sorted;
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![Box::new(DeviceStateTable), Box::new(HistoryEventTable)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTable {
        name: &'static str,
        dependencies: Vec<&'static str>,
    }

    impl Table for MockTable {
        fn name(&self) -> &'static str {
            self.name
        }

        fn create(&self) -> String {
            format!("CREATE TABLE {};", self.name)
        }

        fn dispose(&self) -> String {
            format!("DROP TABLE {};", self.name)
        }

        fn dependencies(&self) -> Vec<&'static str> {
            self.dependencies.clone()
        }
    }

    fn table(name: &'static str, dependencies: Vec<&'static str>) -> Box<dyn Table> {
        Box::new(MockTable { name, dependencies })
    }

    #[test]
    fn test_correct_creation_order() {
        let manager = SchemaManager::new(vec![
            table("history_archive", vec!["history_events", "device_states"]),
            table("history_events", vec!["device_states"]),
            table("device_states", vec![]),
        ]);
        let statements = manager.create_schema();

        assert_eq!(statements[0], "CREATE TABLE device_states;");
        assert_eq!(statements[1], "CREATE TABLE history_events;");
        assert_eq!(statements[2], "CREATE TABLE history_archive;");
    }

    #[test]
    fn test_dispose_in_reverse_order() {
        let manager = SchemaManager::new(vec![
            table("history_events", vec!["device_states"]),
            table("device_states", vec![]),
        ]);

        assert_eq!(
            manager.dispose_schema(),
            vec!["DROP TABLE history_events;", "DROP TABLE device_states;"]
        );
    }

    #[test]
    fn test_default_schema_is_idempotent() {
        let statements = SchemaManager::default().create_schema();

        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| s.contains("IF NOT EXISTS")));
    }
}
