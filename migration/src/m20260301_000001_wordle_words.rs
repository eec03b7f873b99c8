use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WordleWord::Table)
                    .if_not_exists()
                    .col(string(WordleWord::Word).primary_key())
                    .col(string(WordleWord::Category).default("other"))
                    .col(string(WordleWord::AddedBy))
                    .col(
                        timestamp_with_time_zone(WordleWord::CreatedOn)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_wordle_word_category")
                    .table(WordleWord::Table)
                    .col(WordleWord::Category)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_wordle_word_category")
                    .table(WordleWord::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(WordleWord::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum WordleWord {
    Table,
    Word,
    Category,
    AddedBy,
    CreatedOn,
}
